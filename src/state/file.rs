//! # Local Filesystem Preference Store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::backend::PreferenceStore;
use super::errors::{PrefsError, PrefsResult};

/// Preference store writing one `<key>.json` file per key
#[derive(Debug)]
pub struct FilePreferenceStore {
    root: PathBuf,
}

impl FilePreferenceStore {
    /// Create a store rooted at a directory (created on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path used for a key
    pub fn path_for(&self, key: &str) -> PrefsResult<PathBuf> {
        Self::validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }

    // Keys become file names: letters, digits, '.', '_' and '-' only
    fn validate_key(key: &str) -> PrefsResult<()> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

        if valid {
            Ok(())
        } else {
            Err(PrefsError::InvalidKey(key.to_string()))
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> PrefsResult<Option<Value>> {
        let path = self.path_for(key)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PrefsError::Io(e.to_string())),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| PrefsError::Malformed(key.to_string(), e.to_string()))
    }

    fn set(&self, key: &str, value: &Value) -> PrefsResult<()> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.root).map_err(|e| PrefsError::Io(e.to_string()))?;

        let body = serde_json::to_vec_pretty(value).map_err(|e| PrefsError::Internal(e.to_string()))?;
        fs::write(&path, body).map_err(|e| PrefsError::Io(e.to_string()))
    }

    fn remove(&self, key: &str) -> PrefsResult<()> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PrefsError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(tmp.path().join("prefs"));

        assert_eq!(store.get("callHistory.prefs.v1").unwrap(), None);

        store
            .set("callHistory.prefs.v1", &json!({"page_size": 50}))
            .unwrap();
        assert!(tmp.path().join("prefs/callHistory.prefs.v1.json").exists());
        assert_eq!(
            store.get("callHistory.prefs.v1").unwrap(),
            Some(json!({"page_size": 50}))
        );

        store.remove("callHistory.prefs.v1").unwrap();
        store.remove("callHistory.prefs.v1").unwrap();
        assert_eq!(store.get("callHistory.prefs.v1").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(tmp.path());

        for key in ["", "../escape", ".hidden", "a/b", "with space"] {
            assert_eq!(
                store.get(key).unwrap_err(),
                PrefsError::InvalidKey(key.to_string())
            );
        }
    }

    #[test]
    fn test_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(tmp.path());
        fs::write(tmp.path().join("users.prefs.v1.json"), "not json").unwrap();

        assert!(matches!(
            store.get("users.prefs.v1"),
            Err(PrefsError::Malformed(_, _))
        ));
    }
}
