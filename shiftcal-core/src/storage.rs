//! Key-value persistence.
//!
//! Each key holds one JSON document that is always written in full.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ShiftCalError, ShiftCalResult};

/// String key-value storage.
pub trait Storage {
    fn get_item(&self, key: &str) -> ShiftCalResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> ShiftCalResult<()>;
    fn remove_item(&mut self, key: &str) -> ShiftCalResult<()>;
}

/// Stores every key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> ShiftCalResult<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set_item(&mut self, key: &str, value: &str) -> ShiftCalResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ShiftCalError::Storage(format!("Could not create {}: {e}", self.dir.display()))
        })?;

        let path = self.path(key);
        let temp = self.dir.join(format!("{}.json.tmp", key));

        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> ShiftCalResult<()> {
        let path = self.path(key);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> ShiftCalResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> ShiftCalResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> ShiftCalResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Reads a JSON value, falling back to the default when the key is missing,
/// unreadable or corrupt.
pub fn load_json<S: Storage, T: DeserializeOwned + Default>(storage: &S, key: &str) -> T {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(error) => {
            tracing::warn!(key, %error, "failed reading stored value; starting empty");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(key, %error, "stored value is not valid JSON; starting empty");
            T::default()
        }
    }
}

/// Writes a JSON value in full.
pub fn save_json<S: Storage, T: Serialize + ?Sized>(storage: &mut S, key: &str, value: &T) -> ShiftCalResult<()> {
    let content = serde_json::to_string_pretty(value)?;
    storage.set_item(key, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("data"));

        assert_eq!(storage.get_item("shifts").unwrap(), None);

        storage.set_item("shifts", "{\"a\":1}").unwrap();
        assert_eq!(storage.get_item("shifts").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(dir.path().join("data/shifts.json").exists());
        assert!(!dir.path().join("data/shifts.json.tmp").exists());

        storage.remove_item("shifts").unwrap();
        assert_eq!(storage.get_item("shifts").unwrap(), None);
        storage.remove_item("shifts").unwrap();
    }

    #[test]
    fn test_load_json_falls_back_on_corrupt_value() {
        let mut storage = MemoryStorage::new();
        storage.set_item("shifts", "{not json").unwrap();

        let loaded: BTreeMap<String, u32> = load_json(&storage, "shifts");
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load_json() {
        let mut storage = MemoryStorage::new();
        let urls = vec!["https://example.com/a.ics".to_string()];
        save_json(&mut storage, "ical_urls", &urls).unwrap();

        let loaded: Vec<String> = load_json(&storage, "ical_urls");
        assert_eq!(loaded, urls);
    }
}
