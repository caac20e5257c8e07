//! Write-then-rename file updates.
//!
//! Content is written to a temporary file in the destination directory,
//! flushed, and only then renamed over the final name. Readers see either
//! the old file or the complete new one; an interrupted write leaves only
//! an orphaned `.tmp*` file behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

use crate::error::{StoreError, StoreResult};

/// Whether the destination may already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    Replace,
    Refuse,
}

/// Atomically writes `contents` to `path`.
pub fn write_atomic(path: &Path, contents: &[u8], overwrite: Overwrite) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::write(path, e))?;
    tmp.write_all(contents)
        .map_err(|e| StoreError::write(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::write(path, e))?;

    trace!(tmp = %tmp.path().display(), dest = %path.display(), "Renaming into place");

    let persisted = match overwrite {
        Overwrite::Replace => tmp.persist(path),
        Overwrite::Refuse => tmp.persist_noclobber(path),
    };
    persisted.map_err(|e| StoreError::write(path, e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_replace_overwrites() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("counter.txt");

        write_atomic(&path, b"01,0001", Overwrite::Replace).unwrap();
        write_atomic(&path, b"01,0002", Overwrite::Replace).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "01,0002");
    }

    #[test]
    fn test_refuse_keeps_existing_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("record.json");

        write_atomic(&path, b"first", Overwrite::Refuse).unwrap();
        let err = write_atomic(&path, b"second", Overwrite::Refuse).unwrap_err();

        assert!(matches!(err, StoreError::StorageWriteFailure { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("counter.txt");

        write_atomic(&path, b"01,0001", Overwrite::Replace).unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
