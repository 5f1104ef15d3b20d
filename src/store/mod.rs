//! Persistence adapter for the islet overlay core.
//!
//! This module provides the narrow key-value contract the core depends on:
//!
//! - `StateStore`: get/set/remove over string keys and JSON payloads
//! - `MemoryStore`: in-process map, used by tests and as a fallback
//! - `JsonFileStore`: a single JSON map file under the user state dir
//! - `Store`: typed best-effort wrapper the engines actually call
//!
//! Persistence is a best-effort cache only. Writes are fire-and-forget:
//! a failed write is logged and swallowed, never surfaced to the user,
//! and on reload state may be up to one tick stale.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

// ============================================================================
// StoreError
// ============================================================================

/// Errors that can occur in the persistence adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(String),

    /// Stored payload could not be serialized or deserialized.
    #[error("storage serialization error: {0}")]
    Serialization(String),
}

// ============================================================================
// StateStore
// ============================================================================

/// Minimal key-value contract backing timer state and overlay memory.
///
/// Values are JSON documents carried as strings; key namespacing and the
/// storage medium are implementation concerns.
pub trait StateStore: Send + Sync {
    /// Returns the raw JSON payload stored under `key`, if any.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores a raw JSON payload under `key`, replacing any prior value.
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes the value stored under `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ============================================================================
// Store
// ============================================================================

/// Typed, best-effort handle over a `StateStore` implementation.
///
/// All failure handling lives here: `load` returns `None` on any error and
/// `save`/`remove` log and swallow failures, so callers never branch on
/// persistence outcomes.
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn StateStore>,
}

impl Store {
    /// Wraps an existing store implementation.
    pub fn new(inner: Arc<dyn StateStore>) -> Self {
        Self { inner }
    }

    /// Creates a store backed by an in-process map.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Loads and deserializes the value under `key`.
    ///
    /// Returns `None` when the key is absent, unreadable or holds a payload
    /// that no longer deserializes (e.g. after a schema change).
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.inner.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("failed to read '{key}' from store: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("stale or corrupt payload under '{key}': {e}");
                None
            }
        }
    }

    /// Serializes and stores `value` under `key`, best-effort.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("failed to serialize '{key}' for store: {e}");
                return;
            }
        };
        if let Err(e) = self.inner.set_raw(key, &raw) {
            warn!("failed to persist '{key}': {e}");
        }
    }

    /// Removes the value under `key`, best-effort.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.inner.remove(key) {
            warn!("failed to remove '{key}' from store: {e}");
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Payload {
        count: u32,
        label: String,
    }

    /// A store whose writes always fail, for degradation tests.
    struct FailingStore;

    impl StateStore for FailingStore {
        fn get_raw(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io("disk on fire".to_string()))
        }

        fn set_raw(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io("disk on fire".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Io("disk on fire".to_string()))
        }
    }

    #[test]
    fn test_typed_round_trip() {
        let store = Store::in_memory();
        let payload = Payload {
            count: 3,
            label: "hello".to_string(),
        };

        store.save("test.key", &payload);
        let back: Option<Payload> = store.load("test.key");
        assert_eq!(back, Some(payload));
    }

    #[test]
    fn test_load_missing_key_is_none() {
        let store = Store::in_memory();
        let value: Option<Payload> = store.load("absent");
        assert!(value.is_none());
    }

    #[test]
    fn test_remove() {
        let store = Store::in_memory();
        store.save("k", &1u32);
        store.remove("k");
        let value: Option<u32> = store.load("k");
        assert!(value.is_none());
    }

    #[test]
    fn test_remove_missing_key_is_silent() {
        let store = Store::in_memory();
        store.remove("never-existed");
    }

    #[test]
    fn test_corrupt_payload_loads_as_none() {
        let inner = Arc::new(MemoryStore::new());
        inner.set_raw("k", "{not json").unwrap();

        let store = Store::new(inner);
        let value: Option<Payload> = store.load("k");
        assert!(value.is_none());
    }

    #[test]
    fn test_failing_store_is_swallowed() {
        let store = Store::new(Arc::new(FailingStore));

        // None of these may panic or surface an error
        store.save("k", &42u32);
        store.remove("k");
        let value: Option<u32> = store.load("k");
        assert!(value.is_none());
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::Io("broken pipe".to_string());
        assert!(err.to_string().contains("broken pipe"));

        let err = StoreError::Serialization("bad json".to_string());
        assert!(err.to_string().contains("bad json"));
    }
}
