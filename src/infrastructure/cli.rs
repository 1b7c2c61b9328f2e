// Command line surface: argument parsing, logging setup and the run pipeline
// instance file -> model -> engine -> schedule file

use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;

use crate::application::{Instance, InstanceError, Schedule, ScheduleError, SocialGolferModel};
use crate::domain::{SolutionStatus, SolverBackend, SolverConfig, SolverError, SolverService};

/// Errors that end a run with a non-zero exit code
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

#[derive(StructOpt, Debug)]
#[structopt(
    name = "social-golfer",
    about = "Schedules golfers into weekly groups, minimizing repeated meetings"
)]
pub struct Opt {
    /// Instance file: nbGroups groupSize nbWeeks
    #[structopt(name = "INPUT", parse(from_os_str))]
    pub input: PathBuf,

    /// Where to write the schedule; nothing is written when omitted
    #[structopt(name = "OUTPUT", parse(from_os_str))]
    pub output: Option<PathBuf>,

    /// Time limit of the solve call, in seconds
    #[structopt(name = "TIME_LIMIT", default_value = "10")]
    pub time_limit: u64,

    /// Engine backend: auto, cbc or highs
    #[structopt(long, default_value = "auto")]
    pub solver: SolverBackend,

    /// Log more (-v info, -vv debug, -vvv engine output)
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,

    /// Silence all logging
    #[structopt(short, long)]
    pub quiet: bool,
}

/// Everything a run needs, independent of how it was parsed
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub solver: SolverConfig,
}

impl From<&Opt> for RunConfig {
    fn from(opt: &Opt) -> Self {
        Self {
            input: opt.input.clone(),
            output: opt.output.clone(),
            solver: SolverConfig::default()
                .with_backend(opt.solver)
                .with_time_limit(Duration::from_secs(opt.time_limit))
                .with_verbose(opt.verbose >= 3),
        }
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: SolutionStatus,
    pub objective: Option<i64>,
    /// Set when an output file was requested and written
    pub schedule: Option<Schedule>,
}

/// Installs the stderr logger. Warnings are shown by default.
pub fn init_logging(opt: &Opt) -> Result<(), log::SetLoggerError> {
    stderrlog::new()
        .module(env!("CARGO_CRATE_NAME"))
        .verbosity(1 + usize::from(opt.verbose))
        .quiet(opt.quiet)
        .init()
}

/// Reads the instance, solves it with `solver` and, when an output path is
/// configured, writes the schedule and its `.check` verdict.
pub fn run(config: &RunConfig, solver: &dyn SolverService) -> Result<RunOutcome, CliError> {
    log::info!("Processing input file: {}", config.input.display());
    let instance = Instance::from_file(&config.input)?;

    let sgm = SocialGolferModel::build(instance);
    let solution = sgm.solve(solver, &config.solver)?;

    let Some(output) = &config.output else {
        return Ok(RunOutcome {
            status: solution.status,
            objective: solution.objective_value,
            schedule: None,
        });
    };

    let schedule = Schedule::extract(&sgm, &solution)?;
    schedule.save(output)?;
    log::info!("Wrote schedule to {}", output.display());

    match schedule.validate() {
        Ok(()) => log::info!("The solution is a valid partition"),
        Err(violation) => log::warn!("The solution is invalid: {}", violation),
    }
    let recomputed = schedule.redundant_meetings();
    if recomputed != schedule.objective() {
        log::warn!(
            "Engine reported objective {} but the schedule has {} redundant meetings",
            schedule.objective(),
            recomputed
        );
    }
    let check = schedule.save_check(output)?;
    if !schedule.is_perfect() {
        log::warn!("Some golfers meet more than once ({})", check.display());
    }

    Ok(RunOutcome {
        status: solution.status,
        objective: solution.objective_value,
        schedule: Some(schedule),
    })
}
