//! # Operation Archive
//!
//! One pretty-printed JSON file per operation, under a fixed directory.
//!
//! ```text
//! Operaciones de COMPRA/
//! ├── 2024-05-03_14-22-09_PEREZ_JUAN_COMPRA_1000BRL.json
//! └── 2024-05-03_15-01-44_GOMEZ_ANA_COMPRA_250BRL.json
//! ```
//!
//! Files are never overwritten: two operations that would share a name
//! fail with `StorageWriteFailure` instead of losing the earlier record.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use cambista_core::OperationRecord;
use tracing::{debug, info};

use crate::atomic::{write_atomic, Overwrite};
use crate::error::{StoreError, StoreResult};

/// Default archive directory name.
pub const DEFAULT_OPERATIONS_DIR: &str = "Operaciones de COMPRA";

#[derive(Debug, Clone)]
pub struct OperationArchive {
    dir: PathBuf,
}

impl OperationArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        OperationArchive { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `record` will be written.
    pub fn path_for(&self, record: &OperationRecord) -> PathBuf {
        self.dir.join(record.file_name())
    }

    /// Checks that a record named `file_name` can be written: creates the
    /// directory and fails if the file already exists.
    ///
    /// Run before a ticket is issued, so a doomed save never consumes a code.
    pub fn prepare(&self, file_name: &str) -> StoreResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::write(&self.dir, e))?;

        let path = self.dir.join(file_name);
        if path.exists() {
            return Err(StoreError::write(
                &path,
                io::Error::new(ErrorKind::AlreadyExists, "operation file already exists"),
            ));
        }
        debug!(path = %path.display(), "Archive ready");
        Ok(path)
    }

    /// Writes `record`, creating the directory if needed.
    pub fn save(&self, record: &OperationRecord) -> StoreResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::write(&self.dir, e))?;

        let path = self.path_for(record);
        let json = record.to_pretty_json()?;
        write_atomic(&path, json.as_bytes(), Overwrite::Refuse)?;

        info!(path = %path.display(), ticket = %record.ticket, "Operation saved");
        Ok(path)
    }

    /// Reads a record back.
    pub fn load(&self, path: &Path) -> StoreResult<OperationRecord> {
        let raw = std::fs::read_to_string(path).map_err(|e| StoreError::read(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl Default for OperationArchive {
    fn default() -> Self {
        OperationArchive::new(DEFAULT_OPERATIONS_DIR)
    }
}
