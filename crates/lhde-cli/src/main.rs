use lhde_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Log to the state dir; stderr if it isn't writable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("lhde error: {:#}", err);
        std::process::exit(1);
    }
}
