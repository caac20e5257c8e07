//! # Counter Storage
//!
//! Where the ticket counter record lives between runs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CounterStore implementations                         │
//! │                                                                         │
//! │  FileCounterStore                   MemoryCounterStore                 │
//! │  ────────────────                   ──────────────────                 │
//! │  contador_ticket.txt  "01,0042"     Option<String> (tests)             │
//! │  contador_ticket.txt.lock           no-op lock                         │
//! │  write-then-rename on store()                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::atomic::{write_atomic, Overwrite};
use crate::error::{StoreError, StoreResult};
use crate::lock::LockFile;

// =============================================================================
// Trait
// =============================================================================

/// A single text record holding the ticket counter.
pub trait CounterStore {
    /// Guard held for the duration of one issuance.
    type Lock;

    /// Takes exclusive access to the record.
    fn lock(&self) -> StoreResult<Self::Lock>;

    /// Reads the raw record, `None` when it was never written.
    fn load(&self) -> StoreResult<Option<String>>;

    /// Replaces the raw record.
    fn store(&mut self, record: &str) -> StoreResult<()>;
}

// =============================================================================
// File Store
// =============================================================================

/// Counter record kept in a text file.
#[derive(Debug, Clone)]
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCounterStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<counter file>.lock`
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }
}

impl CounterStore for FileCounterStore {
    type Lock = LockFile;

    fn lock(&self) -> StoreResult<LockFile> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::write(parent, e))?;
        }
        LockFile::acquire(self.lock_path())
    }

    fn load(&self) -> StoreResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(record) => {
                debug!(path = %self.path.display(), "Counter record loaded");
                Ok(Some(record))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No counter record yet");
                Ok(None)
            }
            Err(e) => Err(StoreError::read(&self.path, e)),
        }
    }

    fn store(&mut self, record: &str) -> StoreResult<()> {
        write_atomic(&self.path, record.as_bytes(), Overwrite::Replace)
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory counter record, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryCounterStore {
    record: Option<String>,
    writes: usize,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing record.
    pub fn with_record(record: impl Into<String>) -> Self {
        MemoryCounterStore {
            record: Some(record.into()),
            writes: 0,
        }
    }

    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Number of successful `store` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl CounterStore for MemoryCounterStore {
    type Lock = ();

    fn lock(&self) -> StoreResult<()> {
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<String>> {
        Ok(self.record.clone())
    }

    fn store(&mut self, record: &str) -> StoreResult<()> {
        self.record = Some(record.to_string());
        self.writes += 1;
        Ok(())
    }
}
