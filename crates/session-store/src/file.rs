//! File-backed key-value store.
//!
//! One JSON file holds the whole map. Every client process of the same
//! user opens the same file, which is what makes a login or logout
//! performed in another terminal observable here.

use crate::{KeyValueStore, StorageError, StorageResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Key-value storage persisted as a single JSON file.
pub struct FileStore {
    path: PathBuf,
    // Serializes load-modify-save cycles within this process so that a
    // batched update is never half-visible to another in-process reader.
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by `path`. The file is created lazily on
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(map) => Ok(map),
                Err(err) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %err,
                        "storage file is not valid JSON, treating as empty"
                    );
                    Ok(BTreeMap::new())
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    fn save(&self, map: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body =
            serde_json::to_string_pretty(map).map_err(|e| StorageError::Encoding(e.to_string()))?;
        // Write-then-rename so concurrent readers in other processes see
        // either the old file or the new one, never a torn write.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let _guard = self.lock.lock();
        let mut map = self.load()?;
        let removed = map.remove(key).is_some();
        if removed {
            self.save(&map)?;
        }
        Ok(removed)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let mut map = self.load()?;
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        self.save(&map)
    }

    fn delete_many(&self, keys: &[&str]) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let mut map = self.load()?;
        let mut removed = false;
        for key in keys {
            removed |= map.remove(*key).is_some();
        }
        if removed {
            self.save(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_basic_ops() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));

        assert_eq!(store.get("token").unwrap(), None);

        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").unwrap(), Some("abc".to_string()));
        assert!(store.has("token").unwrap());

        assert!(store.delete("token").unwrap());
        assert!(!store.delete("token").unwrap());
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_handles() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let writer = FileStore::new(&path);
        writer.set_many(&[("token", "abc"), ("user", "{}")]).unwrap();

        // A second handle on the same file sees the write, exactly as a
        // second process would.
        let reader = FileStore::new(&path);
        assert_eq!(reader.get("token").unwrap(), Some("abc".to_string()));
        assert_eq!(reader.get("user").unwrap(), Some("{}".to_string()));
    }

    #[test]
    fn test_file_store_corrupt_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_parent_dir_created_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::new(&path);
        store.set("token", "abc").unwrap();

        assert!(path.exists());
        assert_eq!(store.get("token").unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn test_file_store_delete_many_removes_all() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));

        store.set_many(&[("token", "abc"), ("user", "{}")]).unwrap();
        store.delete_many(&["token", "user"]).unwrap();

        assert_eq!(store.get("token").unwrap(), None);
        assert_eq!(store.get("user").unwrap(), None);
    }
}
