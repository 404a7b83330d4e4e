//! Storage abstraction for persisted index state.
//!
//! A single `StorageBackend` trait with two implementations: `MemoryStorage`
//! for tests and embedding, and `FileStorage` which keeps all keys in one
//! JSON file, read and written synchronously. Higher layers store structured
//! data through the `save_json_backend`/`load_json_backend` helpers.

use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key/value storage. Keys and values are UTF-8 strings; use the free
/// JSON helpers below for structured data so the trait stays object-safe.
pub trait StorageBackend: Send + Sync {
    /// Store a string value for a key
    fn set_string(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Read a string value for a key. Returns `Ok(None)` when the key is missing.
    fn get_string(&self, key: &str) -> StorageResult<Option<String>>;

    /// Remove a key (no-op if the key does not exist)
    fn remove(&self, key: &str) -> StorageResult<()>;
}

pub fn save_json_backend<T: Serialize>(
    backend: &dyn StorageBackend,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let json = serde_json::to_string(value)?;
    backend.set_string(key, &json)
}

pub fn load_json_backend<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> StorageResult<Option<T>> {
    match backend.get_string(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// In-memory backend for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn set_string(&self, key: &str, value: &str) -> StorageResult<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// File-backed storage holding all keys as one JSON object on disk
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> StorageResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_map(&self, map: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn set_string(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_string("missing").unwrap(), None);

        storage.set_string("key", "value").unwrap();
        assert_eq!(storage.get_string("key").unwrap().as_deref(), Some("value"));

        storage.remove("key").unwrap();
        assert_eq!(storage.get_string("key").unwrap(), None);
    }

    #[test]
    fn test_json_helpers() {
        let storage = MemoryStorage::new();

        let values = vec![1i32, 2, 3];
        save_json_backend(&storage, "numbers", &values).unwrap();

        let restored: Option<Vec<i32>> = load_json_backend(&storage, "numbers").unwrap();
        assert_eq!(restored, Some(values));

        let missing: Option<Vec<i32>> = load_json_backend(&storage, "missing").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_json_helper_rejects_corrupt_data() {
        let storage = MemoryStorage::new();
        storage.set_string("bad", "not json at all").unwrap();

        let result: StorageResult<Option<Vec<i32>>> = load_json_backend(&storage, "bad");
        assert!(result.is_err());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "flightmap-index-storage-test-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get_string("key").unwrap(), None);

        storage.set_string("key", "value").unwrap();
        storage.set_string("other", "thing").unwrap();

        // A fresh handle reads what the first one wrote
        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get_string("key").unwrap().as_deref(),
            Some("value")
        );
        assert_eq!(
            reopened.get_string("other").unwrap().as_deref(),
            Some("thing")
        );

        reopened.remove("key").unwrap();
        assert_eq!(reopened.get_string("key").unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }
}
