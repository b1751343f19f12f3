//! # Preference Store Trait

use serde_json::Value;

use super::errors::PrefsResult;

/// Durable key-value storage for view preferences.
///
/// Values are JSON. Callers treat every error as "nothing stored"; the
/// backend only reports what went wrong.
pub trait PreferenceStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under key
    fn get(&self, key: &str) -> PrefsResult<Option<Value>>;

    /// Store a value under key, replacing any previous one
    fn set(&self, key: &str, value: &Value) -> PrefsResult<()>;

    /// Remove the value under key; removing an absent key is not an error
    fn remove(&self, key: &str) -> PrefsResult<()>;
}
