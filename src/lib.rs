// Domain layer: engine-agnostic model, solver contract, value objects
pub mod domain;

// Application layer: the Social Golfer model and schedule extraction
pub mod application;

// Infrastructure layer: command line surface
pub mod infrastructure;

// Solver adapters: linearization and concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    BoolVar, Constraint, ConstraintType, ExprId, Expression, Model, Objective, OptimizationType,
    Solution, SolutionStatus, SolverBackend, SolverConfig, SolverError, SolverService,
};

pub use application::{Instance, InstanceError, Schedule, ScheduleError, SocialGolferModel};

pub use infrastructure::{run, CliError, Opt, RunConfig};

pub use solver::LinearProgram;

#[cfg(feature = "solvers")]
pub use solver::{CoinCbcSolver, HighsSolver, SolverFactory};
