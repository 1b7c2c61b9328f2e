// Solver adapters: concrete implementations of SolverService

pub mod linearize;

#[cfg(feature = "solvers")]
pub mod coin_cbc_solver;
#[cfg(feature = "solvers")]
pub mod factory;
#[cfg(feature = "solvers")]
pub mod highs_solver;

pub use linearize::LinearProgram;

#[cfg(feature = "solvers")]
pub use coin_cbc_solver::CoinCbcSolver;
#[cfg(feature = "solvers")]
pub use factory::SolverFactory;
#[cfg(feature = "solvers")]
pub use highs_solver::HighsSolver;
