//! Advisory lock around a ticket issuance.
//!
//! The lock is a sibling file created with `create_new`, so only one process
//! can hold it. It is removed when the guard drops, on success and error
//! paths alike.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Held lock; dropping it releases the lock.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
}

impl LockFile {
    /// Takes the lock at `path`.
    ///
    /// ## Errors
    /// - [`StoreError::Locked`] if the lock file already exists
    /// - [`StoreError::StorageWriteFailure`] for any other I/O failure
    pub fn acquire(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let owner = read_owner(&path);
                warn!(path = %path.display(), ?owner, "Counter lock already held");
                return Err(StoreError::Locked { path, owner });
            }
            Err(e) => return Err(StoreError::write(&path, e)),
        };

        // Owner pid, for whoever has to clean up after a crash.
        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            debug!(path = %path.display(), error = %e, "Could not record lock owner");
        }

        debug!(path = %path.display(), "Counter lock acquired");
        Ok(LockFile { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Pid written by the holder, if the file has one.
fn read_owner(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
}

impl Drop for LockFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Counter lock released"),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to release counter lock")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_second_acquire_is_locked() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("counter.lock");

        let _held = LockFile::acquire(&path).unwrap();
        let err = LockFile::acquire(&path).unwrap_err();

        assert!(matches!(
            err,
            StoreError::Locked { owner: Some(pid), .. } if pid == std::process::id()
        ));
    }

    #[test]
    fn test_leftover_lock_reports_recorded_pid() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("counter.lock");
        std::fs::write(&path, "4242\n").unwrap();

        let err = LockFile::acquire(&path).unwrap_err();

        assert!(err.to_string().contains("process 4242"));
        assert!(err.to_string().contains(path.to_str().unwrap()));
        // a refused acquire leaves the holder's file alone
        assert!(path.exists());
    }

    #[test]
    fn test_unreadable_owner_is_reported_as_unknown() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("counter.lock");
        std::fs::write(&path, "").unwrap();

        let err = LockFile::acquire(&path).unwrap_err();

        assert!(matches!(err, StoreError::Locked { owner: None, .. }));
    }

    #[test]
    fn test_drop_releases() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("counter.lock");

        {
            let held = LockFile::acquire(&path).unwrap();
            assert!(held.path().exists());
        }

        assert!(!path.exists());
        assert!(LockFile::acquire(&path).is_ok());
    }
}
