use social_golfer::infrastructure::{init_logging, run, Opt, RunConfig};
use social_golfer::SolverFactory;
use std::process;
use structopt::StructOpt;

fn main() {
    // Usage errors exit with code 1 from the parser
    let opt = Opt::from_args();
    if let Err(e) = init_logging(&opt) {
        eprintln!("Cannot initialize logging: {}", e);
    }

    // Create solver instance
    let config = RunConfig::from(&opt);
    let solver = SolverFactory::create_solver(&config.solver);

    if let Err(e) = run(&config, solver.as_ref()) {
        eprintln!("An error occurred: {}", e);
        process::exit(1);
    }
}
