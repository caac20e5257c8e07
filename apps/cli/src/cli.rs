//! Command-line arguments.
//!
//! Every operation input can be given as a flag; whatever is missing is
//! asked for interactively.
//!
//! ```bash
//! # Fully interactive
//! cambista
//!
//! # Scripted
//! cambista --client-code 42 --last-name Perez --first-name Juan \
//!     --brl-usd-rate 5 --usd-ars-rate 1000 --brl-amount 1000 \
//!     --profit-brl 0.02 --profit-ars 5
//!
//! # Last issued ticket
//! cambista --show-counter
//! ```

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::config::AppConfig;

/// Cambista - BRL purchase quotes, tickets and operation records
#[derive(Debug, Parser)]
#[command(name = "cambista", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a cambista.toml config file
    #[arg(long, env = "CAMBISTA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for operation JSON files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Ticket counter file
    #[arg(long)]
    pub counter_file: Option<PathBuf>,

    /// Ticket code prefix
    #[arg(long)]
    pub ticket_prefix: Option<String>,

    /// Print the last issued ticket and exit
    #[arg(long)]
    pub show_counter: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub operation: OperationArgs,
}

/// Pre-supplied answers for one operation.
#[derive(Debug, Clone, Default, Args)]
pub struct OperationArgs {
    #[arg(long)]
    pub client_code: Option<i64>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    /// BRL per USD
    #[arg(long)]
    pub brl_usd_rate: Option<f64>,

    /// ARS per USD
    #[arg(long)]
    pub usd_ars_rate: Option<f64>,

    /// BRL to buy
    #[arg(long)]
    pub brl_amount: Option<f64>,

    /// Profit per USD, in BRL
    #[arg(long)]
    pub profit_brl: Option<f64>,

    /// Profit per USD, in ARS
    #[arg(long)]
    pub profit_ars: Option<f64>,
}

impl Cli {
    /// Applies flag overrides on top of a loaded config.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.output_dir {
            config.storage.output_dir = dir.clone();
        }
        if let Some(file) = &self.counter_file {
            config.storage.counter_file = file.clone();
        }
        if let Some(prefix) = &self.ticket_prefix {
            config.ticket.prefix = prefix.clone();
        }
    }
}
