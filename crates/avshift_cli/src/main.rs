//! avshift - main entry point
//!
//! Parses the command line and hands off to the command runner. Exit codes:
//! - 0: every job succeeded (or there was nothing to do)
//! - 1: at least one job failed
//! - 2: the run could not start (bad config, bad flags, unreadable directory)

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match commands::run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
