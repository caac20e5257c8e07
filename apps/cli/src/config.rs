//! # Console Configuration
//!
//! Where Cambista keeps its files and which ticket prefix it issues.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --output-dir, --counter-file, --ticket-prefix                      │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     CAMBISTA_OUTPUT_DIR, CAMBISTA_COUNTER_FILE, CAMBISTA_TICKET_PREFIX │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, or the platform config dir:                       │
//! │     ~/.config/cambista/cambista.toml (Linux)                           │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     ./Operaciones de COMPRA, ./contador_ticket.txt, prefix TC          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! output_dir = "Operaciones de COMPRA"
//! counter_file = "contador_ticket.txt"
//!
//! [ticket]
//! prefix = "TC"
//! ```

use std::path::PathBuf;

use cambista_core::DEFAULT_TICKET_PREFIX;
use cambista_store::{DEFAULT_COUNTER_FILE, DEFAULT_OPERATIONS_DIR};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

// =============================================================================
// Storage Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory that receives one JSON file per operation.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Ticket counter record.
    #[serde(default = "default_counter_file")]
    pub counter_file: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OPERATIONS_DIR)
}

fn default_counter_file() -> PathBuf {
    PathBuf::from(DEFAULT_COUNTER_FILE)
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            output_dir: default_output_dir(),
            counter_file: default_counter_file(),
        }
    }
}

// =============================================================================
// Ticket Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSettings {
    /// Letters in front of every ticket code.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    DEFAULT_TICKET_PREFIX.to_string()
}

impl Default for TicketSettings {
    fn default() -> Self {
        TicketSettings {
            prefix: default_prefix(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub ticket: TicketSettings,
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (an explicit path must exist; the default may not)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(CliError::ConfigNotFound { path }),
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(path)?,
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document.
    pub fn from_toml(contents: &str) -> CliResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn from_file(path: PathBuf) -> CliResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| CliError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Applies `CAMBISTA_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("CAMBISTA_OUTPUT_DIR") {
            debug!(output_dir = %dir, "Overriding output dir from environment");
            self.storage.output_dir = PathBuf::from(dir);
        }

        if let Some(file) = lookup("CAMBISTA_COUNTER_FILE") {
            debug!(counter_file = %file, "Overriding counter file from environment");
            self.storage.counter_file = PathBuf::from(file);
        }

        if let Some(prefix) = lookup("CAMBISTA_TICKET_PREFIX") {
            self.ticket.prefix = prefix;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.storage.output_dir.as_os_str().is_empty() {
            return Err(CliError::InvalidConfig("output_dir must not be empty".into()));
        }

        if self.storage.counter_file.as_os_str().is_empty() {
            return Err(CliError::InvalidConfig("counter_file must not be empty".into()));
        }

        let prefix = &self.ticket.prefix;
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CliError::InvalidConfig(format!(
                "ticket prefix must be non-empty ASCII letters or digits, got: {:?}",
                prefix
            )));
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cambista", "cambista")
            .map(|dirs| dirs.config_dir().join("cambista.toml"))
    }
}
