//! Client-side key/value storage for the session.
//!
//! Mirrors browser local storage: string keys, string values, synchronous
//! access. Only two keys are ever written, [`TOKEN_KEY`] and [`USER_KEY`].

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

/// Key holding the raw session token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the serialized user profile.
pub const USER_KEY: &str = "user";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object of strings.
    #[error("Corrupt storage file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A synchronous string key/value store.
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object in a file.
///
/// The whole file is rewritten on every change through a sibling temp file
/// and a rename, so a crash never leaves a half-written session behind.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        // Remove leftovers so the mode below applies to a fresh file.
        match fs::remove_file(&tmp) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(io_err(e)),
        }
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&tmp).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.store(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        // An unreadable file is replaced rather than blocking logout.
        let (mut entries, unreadable) = match self.load() {
            Ok(entries) => (entries, false),
            Err(_) => (BTreeMap::new(), true),
        };
        if entries.remove(key).is_none() && !unreadable {
            return Ok(());
        }
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(source) => Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                }),
            };
        }
        self.store(&entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("taskdesk-storage-{}-{name}", std::process::id()))
            .join("session.json")
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

        storage.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

        storage.remove(TOKEN_KEY).unwrap();
        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let path = temp_path("persist");
        let _ = fs::remove_file(&path);

        FileStorage::new(&path).set(USER_KEY, "{\"id\":1}").unwrap();
        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get(USER_KEY).unwrap().as_deref(),
            Some("{\"id\":1}")
        );

        reopened.remove(USER_KEY).unwrap();
        assert!(!path.exists());
        assert_eq!(reopened.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_keeps_other_keys_on_remove() {
        let path = temp_path("partial");
        let _ = fs::remove_file(&path);
        let storage = FileStorage::new(&path);

        storage.set(TOKEN_KEY, "t").unwrap();
        storage.set(USER_KEY, "u").unwrap();
        storage.remove(TOKEN_KEY).unwrap();

        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap().as_deref(), Some("u"));
        storage.remove(USER_KEY).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_reported_on_read_and_replaced_on_remove() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        let storage = FileStorage::new(&path);

        assert!(matches!(
            storage.get(TOKEN_KEY),
            Err(StorageError::Corrupt { .. })
        ));
        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path("mode");
        let _ = fs::remove_file(&path);
        let storage = FileStorage::new(&path);

        storage.set(TOKEN_KEY, "secret").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // A stale temp file with wider permissions is not reused.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, "stale").unwrap();
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o644)).unwrap();
        storage.set(USER_KEY, "u").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!tmp.exists());

        storage.remove(TOKEN_KEY).unwrap();
        storage.remove(USER_KEY).unwrap();
    }
}
