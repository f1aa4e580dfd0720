use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::errors::{StoreErrorKind, StoreResult};

/// Minimal persistence port: put/get/list/delete by string key.
pub trait KvStore: Send + Sync {
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;
    /// Keys starting with `prefix`, sorted.
    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>>;
    /// Returns true when the key existed.
    fn delete(&self, key: &str) -> StoreResult<bool>;
}

#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    inner: DashMap<String, Vec<u8>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl KvStore for InMemoryKvStore {
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.inner.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.inner.get(key).map(|entry| entry.value().clone()))
    }

    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .inner
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        Ok(self.inner.remove(key).is_some())
    }
}

/// One file per key under `root`; file names are the percent-encoded key.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    root: PathBuf,
}

const FILE_EXT: &str = "json";

impl FileKvStore {
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "file kv store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() {
            return Err(StoreErrorKind::InvalidKey("empty key".into()).into());
        }
        let encoded = urlencoding::encode(key);
        Ok(self.root.join(format!("{encoded}.{FILE_EXT}")))
    }

    fn key_for(path: &Path) -> Option<String> {
        if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXT) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        urlencoding::decode(stem).ok().map(|key| key.into_owned())
    }

    fn write_atomic(path: &Path, data: &[u8]) -> StoreResult<()> {
        let tmp = path.with_extension("tmp");
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl KvStore for FileKvStore {
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let path = self.path_for(key)?;
        Self::write_atomic(&path, value)
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(%err, "skipping unreadable store entry");
                    continue;
                }
            };
            if let Some(key) = Self::key_for(&entry.path()) {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KvStore) {
        store.put("recording_session:a", b"one").expect("put a");
        store.put("recording_session:b", b"two").expect("put b");
        store.put("other:c", b"three").expect("put c");

        assert_eq!(
            store.get("recording_session:a").expect("get"),
            Some(b"one".to_vec())
        );
        assert_eq!(store.get("missing").expect("get missing"), None);
        assert_eq!(
            store.list_keys("recording_session:").expect("list"),
            vec!["recording_session:a".to_string(), "recording_session:b".to_string()]
        );
        assert!(store.delete("recording_session:a").expect("delete"));
        assert!(!store.delete("recording_session:a").expect("delete again"));
    }

    #[test]
    fn in_memory_store_contract() {
        let store = InMemoryKvStore::new();
        exercise(&store);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn file_store_contract() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileKvStore::open(dir.path()).expect("open");
        exercise(&store);
        assert!(dir.path().join("recording_session%3Ab.json").exists());
    }

    #[test]
    fn file_store_overwrites_atomically() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileKvStore::open(dir.path()).expect("open");
        store.put("k", b"first").expect("put");
        store.put("k", b"second").expect("put again");
        assert_eq!(store.get("k").expect("get"), Some(b"second".to_vec()));
        assert!(!dir.path().join("k.tmp").exists());
    }

    #[test]
    fn empty_key_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileKvStore::open(dir.path()).expect("open");
        assert!(store.put("", b"x").is_err());
    }
}
