//! Oracle Data Pump parameter-file validator and generator.
//!
//! Reads a JSON job file, validates it and prints the parameter file and
//! command line. Generated text goes to stdout; logs, warnings and errors
//! go to stderr.

use clap::Parser;
use parforge::{Cli, execute};
use parforge_core::logging::init_logging;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet, cli.global.log_json) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let outcome = match execute(&cli).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    for message in &outcome.errors {
        eprintln!("error: {}", message);
    }
    if !cli.global.quiet {
        for note in &outcome.notes {
            eprintln!("{}", note);
        }
    }
    if !outcome.output.is_empty() {
        println!("{}", outcome.output);
    }

    if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
