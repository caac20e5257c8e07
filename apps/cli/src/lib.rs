//! # Cambista Operator Console
//!
//! Thin orchestration over `cambista-core` and `cambista-store`.
//!
//! ## Module Organization
//! ```text
//! cambista_cli/
//! ├── lib.rs      ◄─── You are here (startup: logging, config, dispatch)
//! ├── cli.rs      ◄─── clap arguments
//! ├── config.rs   ◄─── AppConfig (defaults → TOML → env → flags)
//! ├── prompt.rs   ◄─── Operator prompts
//! ├── app.rs      ◄─── One operation end to end
//! └── error.rs    ◄─── CliError + exit codes
//! ```
//!
//! ## Startup Sequence
//! 1. Parse flags
//! 2. Initialize tracing (stderr, so stdout stays operator-facing)
//! 3. Load and validate configuration
//! 4. Run one operation, or print the counter

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod prompt;

use std::io;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::prompt::Prompter;

/// Runs the console with parsed arguments.
pub fn run(cli: &Cli) -> CliResult<()> {
    let mut config = AppConfig::load(cli.config.clone())?;
    cli.apply_to(&mut config);
    config.validate()?;
    debug!(?config, "Configuration resolved");

    if cli.show_counter {
        return app::show_counter(&config, &mut io::stdout().lock());
    }

    let now = chrono::Local::now().naive_local();
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
    app::run_operation(&config, &cli.operation, &mut prompter, now)?;

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cambista=trace` - Show trace for cambista crates only
/// - `--verbose` - Same as `warn,cambista=debug`
/// - Default: WARN level
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "warn,cambista=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
