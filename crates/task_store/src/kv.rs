//! Key-value persistence backends.
//!
//! The store only ever reads and overwrites whole string values, so any
//! backend that can do that works.

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::{TaskStoreError, TaskStoreResult};

/// Opaque string key-value persistence.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Absent keys are `Ok(None)`.
    fn get(&self, key: &str) -> TaskStoreResult<Option<String>>;

    /// Overwrites a value.
    fn set(&self, key: &str, value: &str) -> TaskStoreResult<()>;

    /// Removes a value. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> TaskStoreResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> TaskStoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> TaskStoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> TaskStoreResult<()> {
        (**self).remove(key)
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<E>(_: E) -> TaskStoreError {
    TaskStoreError::Other("Lock poisoned".to_string())
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> TaskStoreResult<Option<String>> {
        let values = self.values.read().map_err(poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TaskStoreResult<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> TaskStoreResult<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key, with the key percent-encoded.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> TaskStoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    /// Directory holding the value files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> TaskStoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> TaskStoreResult<()> {
        let path = self.path_for(key);
        // Write then rename so a crash never leaves a half-written value.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> TaskStoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryKvStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_crud() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path().join("data")).unwrap();

        assert!(store.get("projects_a@example.com").unwrap().is_none());
        store.set("projects_a@example.com", "[]").unwrap();
        assert_eq!(
            store.get("projects_a@example.com").unwrap().as_deref(),
            Some("[]")
        );
        assert!(store.root().join("projects_a%40example.com.json").exists());

        store.remove("projects_a@example.com").unwrap();
        assert!(store.get("projects_a@example.com").unwrap().is_none());
        store.remove("projects_a@example.com").unwrap();
    }

    #[test]
    fn test_file_store_keys_stay_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path().join("data")).unwrap();

        store.set("../escape", "x").unwrap();
        assert!(store.root().join("..%2Fescape.json").exists());
        assert!(!dir.path().join("escape.json").exists());
        assert_eq!(store.get("../escape").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_file_store_similar_keys_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path()).unwrap();
        let keys = [
            "projects_a/b@x.com",
            "projects_a_b@x.com",
            "projects_a:b@x.com",
            "projects_a\\b@x.com",
            "projects_a%2Fb@x.com",
        ];

        for (i, key) in keys.iter().enumerate() {
            store.set(key, &i.to_string()).unwrap();
        }
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(store.get(key).unwrap(), Some(i.to_string()));
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), keys.len());

        store.remove("projects_a/b@x.com").unwrap();
        assert_eq!(store.get("projects_a_b@x.com").unwrap().as_deref(), Some("1"));
    }
}
