// Domain service interface for optimization engines
// Any engine that can take a Model and return a Solution within a time limit
// plugs in here; the golfer model never depends on a concrete backend.

use super::models::{Model, Solution, SolverConfig};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization engines
///
/// Model declaration (variables, expressions, constraints, objective) lives
/// on [`Model`]; an engine only provides the blocking, time-limited solve and
/// reports the assignment through [`Solution`].
pub trait SolverService: Send + Sync {
    /// Solve a model within `config.time_limit`
    ///
    /// Infeasibility and an exhausted time limit are reported through
    /// [`Solution::status`], not as errors.
    fn solve(&self, model: &Model, config: &SolverConfig) -> Result<Solution>;

    /// Validate a model without solving it
    fn validate(&self, model: &Model) -> Result<()> {
        let errors = model.structural_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}
