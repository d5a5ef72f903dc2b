//! Cache backend trait and types.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about a cache namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheMeta {
    /// Namespace name.
    pub namespace: String,
    /// Number of entries in this namespace.
    pub entry_count: usize,
    /// Total size of all entries in bytes.
    pub total_size_bytes: u64,
    /// When an entry in the namespace was last written.
    pub last_modified: Option<DateTime<Utc>>,
}

impl CacheMeta {
    pub fn empty(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            ..Self::default()
        }
    }
}

/// Generic cache backend trait.
///
/// Namespace-isolated key-value storage for raw bytes. Operations are
/// synchronous; [`ResponseCache`](super::ResponseCache) moves them off the
/// async executor.
pub trait CacheBackend: Send + Sync {
    /// Get cached bytes by key.
    ///
    /// Returns `None` if the key (or the whole namespace) doesn't exist.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store bytes, overwriting any existing entry with the same key.
    ///
    /// Creates the namespace if it does not exist yet.
    fn set(&self, namespace: &str, key: &str, value: &[u8]) -> Result<()>;

    /// Delete every entry in a namespace and leave an empty namespace behind.
    ///
    /// Must succeed when the namespace was never created.
    fn clear_namespace(&self, namespace: &str) -> Result<()>;

    /// Get metadata for a namespace.
    fn namespace_meta(&self, namespace: &str) -> Result<CacheMeta>;
}
