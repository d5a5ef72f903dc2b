//! Favorite movie persistence.
//!
//! Favorites are a set of movie ids stored as a sorted JSON array. Every
//! change is written atomically; if the write fails the in-memory set is
//! rolled back so it never diverges from what is on disk.

use crate::atomic::{atomic_write_json, read_json};
use crate::error::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Storage for the user's favorite movie ids.
pub trait FavoritesStore: Send + Sync {
    fn is_favorite(&self, id: u64) -> bool;

    /// Flip the favorite flag for `id`. Returns the new state.
    fn toggle(&self, id: u64) -> Result<bool>;

    /// All favorite ids in ascending order.
    fn ids(&self) -> Vec<u64>;
}

/// [`FavoritesStore`] persisted to a JSON file.
#[derive(Debug)]
pub struct JsonFavoritesStore {
    path: PathBuf,
    ids: RwLock<BTreeSet<u64>>,
}

impl JsonFavoritesStore {
    /// Load favorites from `path`.
    ///
    /// A missing file is an empty set. An unreadable or corrupt file is
    /// logged and also treated as empty; the next toggle overwrites it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = match read_json::<BTreeSet<u64>>(&path) {
            Ok(Some(ids)) => {
                debug!("Loaded {} favorites from {}", ids.len(), path.display());
                ids
            }
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!("Ignoring unreadable favorites file {}: {}", path.display(), e);
                BTreeSet::new()
            }
        };
        Self {
            path,
            ids: RwLock::new(ids),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeSet<u64>> {
        self.ids.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeSet<u64>> {
        self.ids.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl FavoritesStore for JsonFavoritesStore {
    fn is_favorite(&self, id: u64) -> bool {
        self.read().contains(&id)
    }

    fn toggle(&self, id: u64) -> Result<bool> {
        let mut ids = self.write();
        let now_favorite = if ids.remove(&id) {
            false
        } else {
            ids.insert(id);
            true
        };

        if let Err(e) = atomic_write_json(&self.path, &*ids) {
            if now_favorite {
                ids.remove(&id);
            } else {
                ids.insert(id);
            }
            return Err(e);
        }

        debug!("Movie {} favorite: {}", id, now_favorite);
        Ok(now_favorite)
    }

    fn ids(&self) -> Vec<u64> {
        self.read().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = JsonFavoritesStore::open(temp.path().join("favorites.json"));
        assert!(store.ids().is_empty());
        assert!(!store.is_favorite(1));
    }

    #[test]
    fn test_toggle_persists_sorted_ids() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("favorites.json");
        let store = JsonFavoritesStore::open(&path);

        assert!(store.toggle(550).unwrap());
        assert!(store.toggle(13).unwrap());
        assert!(store.is_favorite(550));
        assert_eq!(store.ids(), vec![13, 550]);

        let on_disk: Vec<u64> = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk, vec![13, 550]);

        assert!(!store.toggle(550).unwrap());
        let reopened = JsonFavoritesStore::open(&path);
        assert_eq!(reopened.ids(), vec![13]);
    }

    #[test]
    fn test_corrupt_file_loads_empty_and_is_replaced() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("favorites.json");
        fs::write(&path, b"{ not json").unwrap();

        let store = JsonFavoritesStore::open(&path);
        assert!(store.ids().is_empty());

        store.toggle(7).unwrap();
        assert_eq!(JsonFavoritesStore::open(&path).ids(), vec![7]);
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, b"file, not a directory").unwrap();

        let store = JsonFavoritesStore::open(blocker.join("favorites.json"));
        assert!(store.toggle(42).is_err());
        assert!(!store.is_favorite(42));
        assert!(store.ids().is_empty());
    }
}
