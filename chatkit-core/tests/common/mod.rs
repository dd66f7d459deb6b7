//! Common test utilities shared across integration tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chatkit_core::storage::{KeyValueStore, StorageError, StorageResult};

/// In-memory store that records every write and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<String>>,
    fail_writes: Mutex<bool>,
}

#[allow(dead_code)]
impl RecordingStore {
    /// Creates an empty store that accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `set` and `delete` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    /// Values of all successful writes, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    /// Current value stored under `key`.
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: String) -> StorageResult<Option<String>> {
        Ok(self.values.lock().unwrap().get(&key).cloned())
    }

    fn set(&self, key: String, value: String) -> StorageResult<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(StorageError::Backend("keychain is locked".to_string()));
        }
        self.writes.lock().unwrap().push(value.clone());
        self.values.lock().unwrap().insert(key, value);
        Ok(())
    }

    fn delete(&self, key: String) -> StorageResult<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(StorageError::Backend("keychain is locked".to_string()));
        }
        self.values.lock().unwrap().remove(&key);
        Ok(())
    }
}
