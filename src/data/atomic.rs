// src/data/atomic.rs - All-or-nothing file replacement
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{LinkageError, LinkageResult};

/// Writes `bytes` to a temporary file next to `path`, syncs it, then renames
/// it over `path`. Readers see either the old file or the complete new one.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> LinkageResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| LinkageError::io(path, e))?;
    tmp.write_all(bytes).map_err(|e| LinkageError::io(path, e))?;
    tmp.flush().map_err(|e| LinkageError::io(path, e))?;
    tmp.as_file().sync_all().map_err(|e| LinkageError::io(path, e))?;
    tmp.persist(path).map_err(|e| LinkageError::io(path, e.error))?;
    Ok(())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        fs::write(&path, "old contents").unwrap();

        write_atomic(&path, b"new contents").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new contents");
        // no temporary files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_directory_is_io_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("report.csv");
        let err = write_atomic(&path, b"x").unwrap_err();
        assert!(matches!(err, LinkageError::Io { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
