//! # CLI Error Type
//!
//! Unified error type for the operator console.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Cambista                               │
//! │                                                                         │
//! │  CoreError  (division by zero, corrupt counter, ...) ──┐               │
//! │  StoreError (write failure, lock held, ...) ───────────┼──► CliError   │
//! │  Config / input errors ────────────────────────────────┘      │        │
//! │                                                               ▼        │
//! │                                          "error: ..." on stderr        │
//! │                                          exit code 1 (run) / 2 (config)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failure ends the current operation only; the next run starts clean
//! from the last committed counter.

use std::path::PathBuf;

use cambista_core::CoreError;
use cambista_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file is unreadable or invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Cannot parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Standard input closed before all answers were given.
    #[error("Input ended before {field} was entered")]
    InputClosed { field: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidConfig(_)
            | CliError::ConfigNotFound { .. }
            | CliError::ConfigParse(_) => 2,
            _ => 1,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::InvalidConfig("x".into()).exit_code(), 2);
        assert_eq!(
            CliError::Core(CoreError::DivisionByZero {
                field: "brl_amount"
            })
            .exit_code(),
            1
        );
    }
}
