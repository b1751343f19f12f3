//! # In-Memory Preference Store

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::backend::PreferenceStore;
use super::errors::{PrefsError, PrefsResult};

/// Preference store kept in process memory.
///
/// Values are held as serialized JSON text, like browser local storage, so a
/// corrupted entry can be planted with [`MemoryPreferenceStore::insert_raw`].
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under key without validation
    pub fn insert_raw(&self, key: impl Into<String>, raw: impl Into<String>) -> PrefsResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PrefsError::Internal("Lock poisoned".into()))?;
        entries.insert(key.into(), raw.into());
        Ok(())
    }

    /// Returns the raw text stored under key
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Returns the number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> PrefsResult<Option<Value>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| PrefsError::Internal("Lock poisoned".into()))?;

        match entries.get(key) {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| PrefsError::Malformed(key.to_string(), e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &Value) -> PrefsResult<()> {
        self.insert_raw(key, value.to_string())
    }

    fn remove(&self, key: &str) -> PrefsResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PrefsError::Internal("Lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}
