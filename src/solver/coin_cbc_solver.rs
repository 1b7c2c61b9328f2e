// COIN-OR CBC adapter
// Translates the linearized model into good_lp's API and runs CBC

use crate::domain::{
    models::{Model, Solution as DomainSolution, SolverConfig},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{
        ConstraintType, OptimizationType, SolutionStatus as DomainSolutionStatus, VariableType,
    },
};
use crate::solver::linearize::LinearProgram;
use good_lp::{
    solvers::{coin_cbc, SolutionStatus as GoodLpStatus, WithTimeLimit},
    variable, variables, Expression, ResolutionError, Solution as GoodLpSolutionTrait, SolverModel,
    Variable as GoodLpVariable,
};
use std::time::Instant;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, model: &Model, config: &SolverConfig) -> Result<DomainSolution> {
        // Validate first
        self.validate(model)?;

        let start_time = Instant::now();
        let lp = LinearProgram::from_model(model);

        // Build columns using good_lp
        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(lp.columns.len());
        for column in &lp.columns {
            let definition = match column.variable_type {
                VariableType::Binary => variable().binary(),
                VariableType::Integer => variable().integer().min(column.lower_bound),
            };
            let definition = match column.upper_bound {
                Some(upper) => definition.max(upper),
                None => definition,
            };
            lp_variables.push(vars.add(definition));
        }

        let to_expression = |terms: &[(usize, f64)], constant: f64| -> Expression {
            let mut expr: Expression = constant.into();
            for &(column, coeff) in terms {
                expr += coeff * lp_variables[column];
            }
            expr
        };

        // Build objective expression
        let objective = to_expression(&lp.objective.terms, lp.objective.constant);
        let mut lp_model = match lp.optimization_type {
            OptimizationType::Minimize => vars.minimise(objective),
            OptimizationType::Maximize => vars.maximise(objective),
        }
        .using(coin_cbc::coin_cbc)
        .with_time_limit(config.time_limit.as_secs_f64());

        // Single thread, so runs are reproducible
        lp_model.set_parameter("threads", "1");
        if !config.verbose {
            lp_model.set_parameter("log", "0");
        }

        // Build constraints
        for row in &lp.rows {
            let lhs = to_expression(&row.terms, 0.0);
            lp_model = match row.constraint_type {
                ConstraintType::LessThanOrEqual => lp_model.with(lhs.leq(row.bound)),
                ConstraintType::Equal => lp_model.with(lhs.eq(row.bound)),
                ConstraintType::GreaterThanOrEqual => lp_model.with(lhs.geq(row.bound)),
            };
        }

        // Solve the problem
        let solution_result = lp_model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = lp.statistics(model, solve_time);

        // Process result
        match solution_result {
            Ok(sol) => {
                let status = match sol.status() {
                    GoodLpStatus::Optimal => DomainSolutionStatus::Optimal,
                    _ => DomainSolutionStatus::Feasible,
                };
                let column_values: Vec<f64> = lp_variables.iter().map(|&v| sol.value(v)).collect();
                let values = lp.variable_values(&column_values);
                Ok(DomainSolution::from_assignment(model, status, values).with_statistics(statistics))
            }
            Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
                DomainSolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_statistics(statistics)),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}
