//! # Store Error Types
//!
//! Error types for counter and archive file operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error / CoreError                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the path that failed                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in app) ← Exit code + operator message                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use cambista_core::CoreError;
use thiserror::Error;

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file or directory could not be created or written.
    ///
    /// ## When This Occurs
    /// - Missing permissions on the output directory
    /// - Disk full
    /// - An operation file with the same name already exists
    ///
    /// The previous counter value is untouched: the new value is only
    /// renamed into place after it is fully written.
    #[error("Cannot write {path}: {source}")]
    StorageWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file exists but could not be read.
    #[error("Cannot read {path}: {source}")]
    StorageReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another issuance holds the counter lock.
    ///
    /// A lock file left behind by a crashed run must be removed by hand
    /// once no other process is issuing tickets; the message names the
    /// file and the pid recorded in it.
    #[error(
        "Ticket counter is locked by {}; delete {path} if that process is no longer running",
        describe_owner(.owner)
    )]
    Locked { path: PathBuf, owner: Option<u32> },

    /// A record could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Domain error (corrupt counter, exhausted series, ...).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a StorageWriteFailure for `path`.
    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        StoreError::StorageWriteFailure {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a StorageReadFailure for `path`.
    pub fn read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        StoreError::StorageReadFailure {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns true when the counter record could not be parsed.
    pub fn is_corrupt_counter(&self) -> bool {
        matches!(self, StoreError::Core(CoreError::CorruptCounterState { .. }))
    }
}

fn describe_owner(owner: &Option<u32>) -> String {
    match owner {
        Some(pid) => format!("process {}", pid),
        None => "another process".to_string(),
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
