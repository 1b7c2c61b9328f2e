// Infrastructure: command line entry point

pub mod cli;

pub use cli::{init_logging, run, CliError, Opt, RunConfig, RunOutcome};
