//! In-memory key-value store.
//!
//! Not persistent across process restarts. Used for tests, previews and as
//! a fallback when a platform has no storage available.

use std::collections::HashMap;
use std::sync::RwLock;

use super::error::{StorageError, StorageResult};
use super::traits::KeyValueStore;

/// Thread-safe [`KeyValueStore`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().map_or(0, |values| values.len())
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Backend("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: String) -> StorageResult<Option<String>> {
        Ok(self.values.read().map_err(poisoned)?.get(&key).cloned())
    }

    fn set(&self, key: String, value: String) -> StorageResult<()> {
        self.values.write().map_err(poisoned)?.insert(key, value);
        Ok(())
    }

    fn delete(&self, key: String) -> StorageResult<()> {
        self.values.write().map_err(poisoned)?.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("a".to_string(), "1".to_string()).unwrap();
        store.set("a".to_string(), "2".to_string()).unwrap();
        assert_eq!(store.get("a".to_string()).unwrap(), Some("2".to_string()));
        assert_eq!(store.len(), 1);
        store.delete("a".to_string()).unwrap();
        store.delete("missing".to_string()).unwrap();
        assert_eq!(store.get("a".to_string()).unwrap(), None);
    }
}
