use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{LocalStorage, Result, StorageError};

#[derive(Debug, Default)]
struct InMemoryState {
    entries: HashMap<String, String>,
    fail_on_read: bool,
    fail_on_write: bool,
}

/// In-memory local storage.
///
/// Clones share the same underlying map, so a test can keep a handle
/// while the cart writes through another one.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut state) = storage.state.write() {
            state.entries.insert(key.into(), value.into());
        }
        storage
    }

    /// Configures subsequent `set`/`remove` calls to fail.
    pub fn set_fail_on_write(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_on_write = fail;
        }
    }

    /// Configures subsequent `get` calls to fail.
    pub fn set_fail_on_read(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_on_read = fail;
        }
    }

    /// Returns the raw value under `key` without going through fault injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.entries.get(key).cloned())
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.entries.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("storage lock poisoned".to_string())
}

impl LocalStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        if state.fail_on_read {
            return Err(StorageError::Unavailable("read disabled".to_string()));
        }
        Ok(state.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.fail_on_write {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        state.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.fail_on_write {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        state.entries.remove(key);
        Ok(())
    }
}
