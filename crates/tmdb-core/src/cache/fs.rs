//! Directory-backed cache storage.
//!
//! Layout: `<root>/<namespace>/<key>.json`, one file per entry. Writes go
//! to a temp file inside the namespace directory and are renamed into
//! place, so a reader never observes a partially written entry and two
//! concurrent writers of the same key leave exactly one of their payloads.

use super::key::CacheKey;
use super::traits::{CacheBackend, CacheMeta};
use crate::atomic::atomic_write;
use crate::config::PathsConfig;
use crate::error::{Result, TmdbError};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cache backend storing each entry as a file.
#[derive(Debug, Clone)]
pub struct FsCacheBackend {
    root: PathBuf,
}

impl FsCacheBackend {
    /// Create a backend rooted at `root`. Nothing is created on disk until
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a namespace's entries.
    pub fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.root.join(namespace)
    }

    fn entry_path(&self, namespace: &str, key: &str) -> Result<PathBuf> {
        if !CacheKey::is_filesystem_safe(namespace) || !CacheKey::is_filesystem_safe(key) {
            return Err(TmdbError::Io {
                message: format!("Refusing unsafe cache path {}/{}", namespace, key),
                path: None,
                source: Some(io::Error::from(io::ErrorKind::InvalidInput)),
            });
        }
        Ok(self
            .namespace_dir(namespace)
            .join(format!("{}.{}", key, PathsConfig::CACHE_FILE_EXTENSION)))
    }
}

impl CacheBackend for FsCacheBackend {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.entry_path(namespace, key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TmdbError::io_with_path(e, path)),
        }
    }

    fn set(&self, namespace: &str, key: &str, value: &[u8]) -> Result<()> {
        let path = self.entry_path(namespace, key)?;
        atomic_write(&path, value)?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn clear_namespace(&self, namespace: &str) -> Result<()> {
        let dir = self.namespace_dir(namespace);
        match fs::remove_dir_all(&dir) {
            Ok(()) => debug!("Removed cache directory {}", dir.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(TmdbError::io_with_path(e, dir)),
        }
        fs::create_dir_all(&dir).map_err(|e| TmdbError::io_with_path(e, &dir))?;
        Ok(())
    }

    fn namespace_meta(&self, namespace: &str) -> Result<CacheMeta> {
        let dir = self.namespace_dir(namespace);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(CacheMeta::empty(namespace))
            }
            Err(e) => return Err(TmdbError::io_with_path(e, dir)),
        };

        let mut meta = CacheMeta::empty(namespace);
        for entry in entries {
            let entry = entry.map_err(|e| TmdbError::io_with_path(e, &dir))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PathsConfig::CACHE_FILE_EXTENSION)
            {
                continue;
            }
            let metadata = entry
                .metadata()
                .map_err(|e| TmdbError::io_with_path(e, &path))?;
            if !metadata.is_file() {
                continue;
            }
            meta.entry_count += 1;
            meta.total_size_bytes += metadata.len();
            if let Ok(modified) = metadata.modified() {
                let modified: DateTime<Utc> = modified.into();
                if meta.last_modified.map_or(true, |last| modified > last) {
                    meta.last_modified = Some(modified);
                }
            }
        }
        Ok(meta)
    }
}
