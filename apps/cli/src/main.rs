//! # Cambista Entry Point
//!
//! The actual setup is in lib.rs for better testability.

use std::process::ExitCode;

use cambista_cli::cli::Cli;
use clap::Parser;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cambista_cli::init_tracing(cli.verbose);

    match cambista_cli::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}
