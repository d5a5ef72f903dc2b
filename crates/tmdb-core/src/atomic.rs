//! Atomic file operations.
//!
//! Writes land in a temp file next to the target and are renamed over it,
//! so readers see either the old content or the new content, never a mix.

use crate::error::{Result, TmdbError};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Write `bytes` to `path` atomically, creating parent directories.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| TmdbError::io_with_path(e, parent))?;

    let mut temp =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| TmdbError::io_with_path(e, parent))?;
    temp.write_all(bytes)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| TmdbError::io_with_path(e, temp.path()))?;
    temp.persist(path)
        .map_err(|e| TmdbError::io_with_path(e.error, path))?;
    Ok(())
}

/// Serialize `data` as pretty JSON and write it atomically.
pub fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let serialized = serde_json::to_vec_pretty(data).map_err(|e| TmdbError::Json {
        message: format!("Failed to serialize {}: {}", path.display(), e),
        source: Some(e),
    })?;
    atomic_write(path, &serialized)
}

/// Read and parse a JSON file. Returns `None` if the file doesn't exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(TmdbError::io_with_path(e, path)),
    };
    let data = serde_json::from_slice(&contents).map_err(|e| TmdbError::Json {
        message: format!("Failed to parse {}: {}", path.display(), e),
        source: Some(e),
    })?;
    Ok(Some(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parents_and_replaces() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("file.json");

        atomic_write(&path, b"one").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"one");

        atomic_write(&path, b"two").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"two");

        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path() != path)
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind");
    }

    #[test]
    fn test_json_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ids.json");

        assert_eq!(read_json::<Vec<u64>>(&path).unwrap(), None);
        atomic_write_json(&path, &vec![3u64, 1, 2]).unwrap();
        assert_eq!(read_json::<Vec<u64>>(&path).unwrap(), Some(vec![3, 1, 2]));
    }

    #[test]
    fn test_read_json_reports_corruption() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, b"{not json").unwrap();
        assert!(matches!(
            read_json::<Vec<u64>>(&path),
            Err(TmdbError::Json { .. })
        ));
    }
}
