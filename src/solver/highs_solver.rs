// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// This is an adapter pattern - translates the linearized model to HiGHS API

use crate::domain::{
    models::{Model, Solution as DomainSolution, SolverConfig},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus as DomainSolutionStatus},
};
use crate::solver::linearize::LinearProgram;
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, model: &Model, config: &SolverConfig) -> Result<DomainSolution> {
        // Validate first
        self.validate(model)?;

        let start_time = Instant::now();
        let lp = LinearProgram::from_model(model);

        // Add columns first (objective costs are set per column), then rows
        let mut pb = RowProblem::default();
        let costs = lp.objective_costs();
        let mut cols = Vec::with_capacity(lp.columns.len());
        for (column, &cost) in lp.columns.iter().zip(&costs) {
            // Every column of a linearized model is integral
            let col = match column.upper_bound {
                Some(upper) => pb.add_integer_column(cost, column.lower_bound..=upper),
                None => pb.add_integer_column(cost, column.lower_bound..),
            };
            cols.push(col);
        }

        for row in &lp.rows {
            let terms: Vec<_> = row.terms.iter().map(|&(c, coeff)| (cols[c], coeff)).collect();
            match row.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=row.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(row.bound..=row.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(row.bound.., &terms);
                }
            }
        }

        let sense = match lp.optimization_type {
            OptimizationType::Minimize => Sense::Minimise,
            OptimizationType::Maximize => Sense::Maximise,
        };

        let mut highs_model = pb.optimise(sense);
        highs_model.set_option("time_limit", config.time_limit.as_secs_f64());
        highs_model.set_option("output_flag", config.verbose);
        // Single thread, so runs are reproducible
        highs_model.set_option("threads", 1);

        // Solve the problem
        let solved = highs_model
            .try_solve()
            .map_err(|status| SolverError::ExecutionFailed(format!("HiGHS error: {:?}", status)))?;
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = lp.statistics(model, solve_time);

        // Process result
        let status = match solved.status() {
            HighsModelStatus::Optimal => DomainSolutionStatus::Optimal,
            HighsModelStatus::ReachedTimeLimit => DomainSolutionStatus::Feasible,
            HighsModelStatus::Infeasible => {
                return Ok(DomainSolution::new(
                    DomainSolutionStatus::Infeasible,
                    "Problem is infeasible: no solution satisfies all constraints",
                )
                .with_statistics(statistics));
            }
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                return Ok(DomainSolution::new(
                    DomainSolutionStatus::Unbounded,
                    "Problem is unbounded: objective can be improved infinitely",
                )
                .with_statistics(statistics));
            }
            status => {
                return Err(SolverError::ExecutionFailed(format!(
                    "HiGHS solver returned status: {:?}",
                    status
                )))
            }
        };

        // A time-limited run may carry no incumbent; from_assignment drops
        // assignments that break the model's constraints.
        let values = lp.variable_values(solved.get_solution().columns());
        Ok(DomainSolution::from_assignment(model, status, values).with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
