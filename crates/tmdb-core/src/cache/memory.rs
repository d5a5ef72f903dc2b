//! In-process cache backend.

use super::traits::{CacheBackend, CacheMeta};
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Entries = HashMap<String, HashMap<String, (Vec<u8>, DateTime<Utc>)>>;

/// Cache backend that keeps entries in memory for the life of the process.
///
/// Useful as a deterministic stand-in for disk storage.
#[derive(Debug, Default)]
pub struct MemoryCacheBackend {
    entries: RwLock<Entries>,
}

impl MemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheBackend for MemoryCacheBackend {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .read()
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .map(|(bytes, _)| bytes.clone()))
    }

    fn set(&self, namespace: &str, key: &str, value: &[u8]) -> Result<()> {
        self.write()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), (value.to_vec(), Utc::now()));
        Ok(())
    }

    fn clear_namespace(&self, namespace: &str) -> Result<()> {
        self.write().insert(namespace.to_string(), HashMap::new());
        Ok(())
    }

    fn namespace_meta(&self, namespace: &str) -> Result<CacheMeta> {
        let entries = self.read();
        let Some(ns) = entries.get(namespace) else {
            return Ok(CacheMeta::empty(namespace));
        };
        Ok(CacheMeta {
            namespace: namespace.to_string(),
            entry_count: ns.len(),
            total_size_bytes: ns.values().map(|(bytes, _)| bytes.len() as u64).sum(),
            last_modified: ns.values().map(|(_, at)| *at).max(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_and_clear() {
        let backend = MemoryCacheBackend::new();
        assert_eq!(backend.get("ns", "k").unwrap(), None);

        backend.set("ns", "k", b"value").unwrap();
        assert_eq!(backend.get("ns", "k").unwrap().as_deref(), Some(&b"value"[..]));
        assert_eq!(backend.namespace_meta("ns").unwrap().total_size_bytes, 5);

        backend.clear_namespace("ns").unwrap();
        assert_eq!(backend.get("ns", "k").unwrap(), None);
        assert_eq!(backend.namespace_meta("ns").unwrap().entry_count, 0);
    }
}
