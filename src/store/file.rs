//! File-backed store implementation.
//!
//! Persists the whole key space as one JSON object in a single file,
//! read and rewritten on every operation. The payloads involved are tiny
//! (a timer snapshot and the overlay's last-active app), so simplicity
//! wins over incremental writes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use super::{StateStore, StoreError};

/// A `StateStore` backed by a single JSON map file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store over the given file path.
    ///
    /// The file and its parent directory are created lazily on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the default state file path (`~/.islet/state.json`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".islet").join("state.json"))
    }

    /// Returns the path this store writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| StoreError::Io(e.to_string()))?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn write_map(&self, map: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(map)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| StoreError::Io(e.to_string()))?;
        debug!("state file updated: {}", self.path.display());
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let map = self.read_map()?;
        Ok(map.get(key).map(std::string::ToString::to_string))
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut map = self.read_map()?;
        // Payloads are JSON documents; rejecting anything else keeps
        // get_raw a faithful round-trip (re-quoting a bare string on the
        // way in would hand back a different payload on the way out).
        let parsed = serde_json::from_str::<Value>(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        map.insert(key.to_string(), parsed);
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}
