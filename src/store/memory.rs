//! In-memory store implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{StateStore, StoreError};

/// A `StateStore` backed by an in-process map.
///
/// Used by tests and as the fallback when no usable state directory
/// exists. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
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
        self.map.lock().unwrap().len()
    }

    /// Returns true if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.map.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let store = MemoryStore::new();
        store.set_raw("a", "1").unwrap();
        assert_eq!(store.get_raw("a").unwrap(), Some("1".to_string()));
    }

    #[test]
    fn test_get_missing() {
        let store = MemoryStore::new();
        assert_eq!(store.get_raw("missing").unwrap(), None);
    }

    #[test]
    fn test_overwrite() {
        let store = MemoryStore::new();
        store.set_raw("a", "1").unwrap();
        store.set_raw("a", "2").unwrap();
        assert_eq!(store.get_raw("a").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        store.set_raw("a", "1").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.get_raw("a").unwrap(), None);
        assert!(store.is_empty());
    }
}
