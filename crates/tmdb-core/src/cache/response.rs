//! Async response cache facade.

use super::fs::FsCacheBackend;
use super::key::CacheKey;
use super::memory::MemoryCacheBackend;
use super::traits::{CacheBackend, CacheMeta};
use crate::config::PathsConfig;
use crate::error::{Result, TmdbError};
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Byte-blob cache of API responses, isolated in one backend namespace.
///
/// The cache is advisory: failing to write is logged and ignored, and a
/// failing read is reported as a miss. Backend calls run on tokio's
/// blocking pool so disk I/O never stalls the executor.
#[derive(Clone)]
pub struct ResponseCache {
    backend: Arc<dyn CacheBackend>,
    namespace: String,
}

impl ResponseCache {
    /// Cache using the default namespace of `backend`.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self::with_namespace(backend, PathsConfig::CACHE_NAMESPACE)
    }

    pub fn with_namespace(backend: Arc<dyn CacheBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    /// Disk-backed cache under `root`.
    pub fn on_disk(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FsCacheBackend::new(root)))
    }

    /// Memory-backed cache, gone when the process exits.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCacheBackend::new()))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Store `bytes` under `key`, replacing any previous entry.
    ///
    /// Failures are logged and swallowed.
    pub async fn put(&self, key: &CacheKey, bytes: Bytes) {
        let len = bytes.len();
        let owned_key = key.clone();
        let result = self
            .run_blocking(move |backend, namespace| {
                backend.set(namespace, owned_key.as_str(), &bytes)
            })
            .await;

        match result {
            Ok(()) => debug!("Cached {} bytes for key {}", len, key),
            Err(e) => warn!("Failed to cache response for key {}: {}", key, e),
        }
    }

    /// Previously stored bytes for `key`, or `None`.
    pub async fn get(&self, key: &CacheKey) -> Option<Bytes> {
        let owned_key = key.clone();
        let result = self
            .run_blocking(move |backend, namespace| backend.get(namespace, owned_key.as_str()))
            .await;

        match result {
            Ok(Some(bytes)) => {
                debug!("Cache hit for key {} ({} bytes)", key, bytes.len());
                Some(Bytes::from(bytes))
            }
            Ok(None) => {
                debug!("Cache miss for key {}", key);
                None
            }
            Err(e) => {
                warn!("Failed to read cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Delete every entry and recreate an empty namespace.
    pub async fn clear(&self) -> Result<()> {
        self.run_blocking(|backend, namespace| backend.clear_namespace(namespace))
            .await?;
        info!("Response cache cleared ({})", self.namespace);
        Ok(())
    }

    pub async fn stats(&self) -> Result<CacheMeta> {
        self.run_blocking(|backend, namespace| backend.namespace_meta(namespace))
            .await
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&dyn CacheBackend, &str) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let namespace = self.namespace.clone();
        tokio::task::spawn_blocking(move || op(backend.as_ref(), &namespace))
            .await
            .map_err(|e| TmdbError::Io {
                message: format!("Cache task failed: {}", e),
                path: None,
                source: None,
            })?
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_get_roundtrip_on_disk() {
        let temp = TempDir::new().unwrap();
        let cache = ResponseCache::on_disk(temp.path());
        let key = CacheKey::from_identity("/movie/1");

        assert!(cache.get(&key).await.is_none());
        cache.put(&key, Bytes::from_static(b"{\"id\":1}")).await;
        assert_eq!(cache.get(&key).await.unwrap(), Bytes::from_static(b"{\"id\":1}"));

        let file = temp
            .path()
            .join(PathsConfig::CACHE_NAMESPACE)
            .join(format!("{}.json", key));
        assert!(file.is_file());
    }

    #[tokio::test]
    async fn test_clear_then_get_is_absent() {
        let cache = ResponseCache::in_memory();
        let keys: Vec<_> = (0..3)
            .map(|i| CacheKey::from_identity(&format!("/movie/{}", i)))
            .collect();
        for key in &keys {
            cache.put(key, Bytes::from_static(b"{}")).await;
        }
        assert_eq!(cache.stats().await.unwrap().entry_count, 3);

        cache.clear().await.unwrap();
        for key in &keys {
            assert!(cache.get(key).await.is_none());
        }
    }

    #[tokio::test]
    async fn test_clear_before_any_write() {
        let temp = TempDir::new().unwrap();
        let cache = ResponseCache::on_disk(temp.path().join("never-created"));
        cache.clear().await.unwrap();
        assert_eq!(cache.stats().await.unwrap().entry_count, 0);
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"file in the way").unwrap();
        let cache = ResponseCache::on_disk(&blocker);
        let key = CacheKey::from_identity("/movie/1");

        cache.put(&key, Bytes::from_static(b"{}")).await;
        assert!(cache.get(&key).await.is_none());
    }
}
