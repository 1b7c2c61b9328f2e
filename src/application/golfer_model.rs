use std::time::Instant;

use crate::domain::{Model, Solution, SolverConfig, SolverService};
use crate::domain::solver_service::Result;

use super::instance::Instance;
use super::lattice::VariableLattice;
use super::meeting::MeetingTable;
use super::partition::{add_partition_constraints, PartitionCounts};
use super::redundancy::RedundancyObjective;

/// Complete Social Golfer model
///
/// Owns the generic [`Model`] together with the handles needed to read a
/// schedule back out of a solution. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct SocialGolferModel {
    instance: Instance,
    model: Model,
    lattice: VariableLattice,
    partition: PartitionCounts,
    meetings: MeetingTable,
    redundancy: RedundancyObjective,
}

impl SocialGolferModel {
    pub fn build(instance: Instance) -> Self {
        let started = Instant::now();
        let mut model = Model::new(format!(
            "social-golfer-{}-{}-{}",
            instance.nb_groups(),
            instance.group_size(),
            instance.nb_weeks()
        ));

        let lattice = VariableLattice::new(&mut model, &instance);
        let partition = add_partition_constraints(&mut model, &instance, &lattice);
        let meetings = MeetingTable::new(&mut model, &instance, &lattice);
        let redundancy = RedundancyObjective::new(&mut model, &meetings);

        log::info!(
            "Built model for {}: {} variables, {} expressions, {} constraints in {:.1} ms",
            instance,
            model.num_variables(),
            model.num_expressions(),
            model.num_constraints(),
            started.elapsed().as_secs_f64() * 1000.0
        );

        Self {
            instance,
            model,
            lattice,
            partition,
            meetings,
            redundancy,
        }
    }

    /// Runs one blocking solve with `solver`, bounded by `config.time_limit`
    pub fn solve(&self, solver: &dyn SolverService, config: &SolverConfig) -> Result<Solution> {
        solver.validate(&self.model)?;
        log::info!(
            "Solving with {} (time limit {:?})",
            solver.name(),
            config.time_limit
        );

        let solution = solver.solve(&self.model, config)?;
        match solution.objective_value {
            Some(objective) => log::info!(
                "Status: {}, objective {} ({:.1} ms)",
                solution.status,
                objective,
                solution.statistics.solve_time_ms
            ),
            None => log::info!("Status: {} ({})", solution.status, solution.message),
        }
        if solution.is_feasible() && !solution.is_optimal() {
            log::warn!("Time limit reached before the schedule was proven optimal");
        }
        Ok(solution)
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn lattice(&self) -> &VariableLattice {
        &self.lattice
    }

    pub fn partition(&self) -> PartitionCounts {
        self.partition
    }

    pub fn meetings(&self) -> &MeetingTable {
        &self.meetings
    }

    pub fn redundancy(&self) -> &RedundancyObjective {
        &self.redundancy
    }
}
