//! Durable key-value storage backends for the cart.
//!
//! The cart only needs "read a string by key" and "overwrite a string by key",
//! so [`CartStorage`] is deliberately that small. Two backends ship here:
//!
//! - [`MemoryStorage`] - process-local map; clones share contents
//! - [`FileStorage`] - one JSON file per key under a data directory

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Another user of the storage panicked while holding it.
    #[error("storage lock poisoned")]
    Poisoned,

    /// Key contains characters that cannot be mapped to a file name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A durable, string-valued key-value store.
pub trait CartStorage {
    /// Read the value stored under `key`, or `None` if nothing was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: CartStorage + ?Sized> CartStorage for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

// =============================================================================
// Memory
// =============================================================================

/// In-memory storage. Cloning yields a handle onto the same map, which lets
/// tests "restart" a store against the data a previous one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================================
// File
// =============================================================================

/// File-backed storage: `<dir>/<key>.json`.
///
/// Each write lands in its own uniquely named temporary sibling and is then
/// renamed into place, so neither readers nor concurrent writers ever observe
/// a partially written snapshot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of this storage.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for empty keys or keys containing
    /// path separators.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{key}."))
            .suffix(".json.tmp")
            .tempfile_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "Wrote storage key");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_missing_key() {
        let storage = MemoryStorage::new();
        assert!(storage.read("cart").unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.write("cart", "[]").unwrap();
        assert_eq!(other.read("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_storage_overwrites() {
        let storage = MemoryStorage::new();
        storage.write("cart", "a").unwrap();
        storage.write("cart", "b").unwrap();
        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_file_storage_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.read("cart").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));
        storage.write("cart", "{\"version\":1}").unwrap();

        assert_eq!(
            storage.read("cart").unwrap().as_deref(),
            Some("{\"version\":1}")
        );
        assert!(dir.path().join("nested/cart.json").exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temporary files left behind: {leftovers:?}");
    }

    #[test]
    fn test_file_storage_concurrent_writers_never_tear() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots: Vec<String> = (0..8)
            .map(|i| format!("{{\"writer\":{i},\"pad\":\"{}\"}}", "x".repeat(64 * 1024)))
            .collect();

        std::thread::scope(|scope| {
            for snapshot in &snapshots {
                let storage = FileStorage::new(dir.path());
                scope.spawn(move || {
                    for _ in 0..10 {
                        storage.write("cart", snapshot).unwrap();
                    }
                });
            }
        });

        let stored = FileStorage::new(dir.path()).read("cart").unwrap().unwrap();
        assert!(snapshots.contains(&stored));
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let storage = FileStorage::new("/tmp/unused");
        assert!(matches!(
            storage.path_for("../cart"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.path_for(""), Err(StorageError::InvalidKey(_))));
    }
}
