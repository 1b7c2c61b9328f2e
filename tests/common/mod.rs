#![allow(dead_code)]

use social_golfer::{
    Instance, Model, Solution, SolutionStatus, SocialGolferModel, SolverConfig, SolverService,
};

/// Engine stub that answers with a fixed schedule, `weeks[week][group]`
pub struct ScheduleSolver {
    values: Vec<bool>,
}

impl ScheduleSolver {
    pub fn new(instance: Instance, weeks: &[Vec<Vec<usize>>]) -> Self {
        let sgm = SocialGolferModel::build(instance);
        let mut values = vec![false; sgm.model().num_variables()];
        for (w, groups) in weeks.iter().enumerate() {
            for (gr, members) in groups.iter().enumerate() {
                for &gf in members {
                    values[sgm.lattice().var(w, gr, gf).ordinal()] = true;
                }
            }
        }
        Self { values }
    }
}

impl SolverService for ScheduleSolver {
    fn solve(&self, model: &Model, _config: &SolverConfig) -> social_golfer::domain::Result<Solution> {
        Ok(Solution::from_assignment(
            model,
            SolutionStatus::Feasible,
            self.values.clone(),
        ))
    }

    fn name(&self) -> &str {
        "schedule stub"
    }
}

/// Splits one ordering of the golfers per week into consecutive groups
pub fn weeks_from_orders(instance: &Instance, orders: &[Vec<usize>]) -> Vec<Vec<Vec<usize>>> {
    orders
        .iter()
        .map(|order| {
            order
                .chunks(instance.group_size())
                .map(|chunk| chunk.to_vec())
                .collect()
        })
        .collect()
}
