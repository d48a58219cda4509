//! Durable local key-value storage for client state.
//!
//! Mirrors the browser's origin-scoped `localStorage`: string keys, string
//! values, synchronous access. The cart writes its whole item list under one
//! key after every change and reads it back once at startup.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Errors raised by a [`LocalStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// Synchronous string key-value store.
pub trait LocalStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the write fails.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Type-erased storage handle, used where the backend is chosen at runtime.
pub type SharedStorage = Arc<dyn LocalStorage + Send + Sync>;

/// Shared handles delegate to the backend they point at, so one backend can
/// sit behind a type-erased `Arc<dyn LocalStorage + Send + Sync>`.
impl<T: LocalStorage + ?Sized> LocalStorage for Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

// =============================================================================
// In-memory storage
// =============================================================================

/// In-process storage backed by a shared map.
///
/// Clones share the same map, so a second store opened on a clone sees what
/// the first one wrote. An optional quota caps the total size of keys plus
/// values, reproducing the "quota exceeded" failures browsers raise.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that rejects writes once `quota` bytes would be used.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Arc::default(),
            quota: Some(quota),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries();

        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

// =============================================================================
// File-backed storage
// =============================================================================

/// Storage that keeps one `<key>.json` file per key inside a directory.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage directory, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        let mut file = fs::File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keys become file names, so only `[A-Za-z0-9._-]` is allowed and a key may
/// not start with a dot.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.get_item("puppyracer-cart").unwrap().is_none());

        storage.set_item("puppyracer-cart", "[]").unwrap();
        assert_eq!(
            storage.get_item("puppyracer-cart").unwrap().as_deref(),
            Some("[]")
        );

        storage.remove_item("puppyracer-cart").unwrap();
        assert!(storage.get_item("puppyracer-cart").unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set_item("k", "v").unwrap();
        assert_eq!(other.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_storage_quota() {
        let storage = MemoryStorage::with_quota(8);
        storage.set_item("k", "1234567").unwrap();

        let err = storage.set_item("k", "12345678").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 9,
                quota: 8
            }
        ));
        // Failed write leaves the old value in place
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("1234567"));
    }

    #[test]
    fn test_arc_dyn_storage_delegates() {
        let memory = MemoryStorage::new();
        let shared: Arc<dyn LocalStorage + Send + Sync> = Arc::new(memory.clone());
        shared.set_item("k", "v").unwrap();
        assert_eq!(memory.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("puppyracer-cart").is_ok());
        assert!(validate_key("cart_v2.backup").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("a/b").is_err());
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("nested")).unwrap();

        assert!(storage.get_item("puppyracer-cart").unwrap().is_none());
        storage.set_item("puppyracer-cart", r#"[{"id":1}]"#).unwrap();
        assert_eq!(
            storage.get_item("puppyracer-cart").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        assert!(storage.dir().join("puppyracer-cart.json").exists());

        storage.remove_item("puppyracer-cart").unwrap();
        storage.remove_item("puppyracer-cart").unwrap();
        assert!(storage.get_item("puppyracer-cart").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(matches!(
            storage.set_item("../outside", "x"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
