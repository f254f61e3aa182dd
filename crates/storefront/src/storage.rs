//! Key-value string storage for the persisted cart.
//!
//! The cart service is the sole writer: it reads one key at startup and
//! rewrites the whole value after every successful mutation. `FileStore`
//! keeps one file per key under a configurable root directory.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Storage key holding the serialized cart snapshot.
pub const CART_KEY: &str = "cart";

/// Errors that can occur when persisting a value.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem write failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value string store.
///
/// `load` is forgiving by contract: a missing or unreadable value is
/// reported as absent, and the caller falls back to an empty cart.
pub trait CartStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn load(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed store: one `<root>/<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created lazily
    /// on first save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Failed to read stored value");
                None
            }
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// In-memory store for unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::{CartStorage, StorageError};

    /// Stores values in a shared map so tests can inspect what was
    /// persisted; can be flipped to fail every save.
    #[derive(Debug, Clone, Default)]
    pub struct MemoryStore {
        values: Arc<Mutex<HashMap<String, String>>>,
        fail_saves: Arc<Mutex<bool>>,
    }

    #[allow(clippy::unwrap_used)]
    impl MemoryStore {
        pub fn get(&self, key: &str) -> Option<String> {
            self.values.lock().unwrap().get(key).cloned()
        }

        pub fn set(&self, key: &str, value: &str) {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }

        pub fn fail_saves(&self) {
            *self.fail_saves.lock().unwrap() = true;
        }
    }

    #[allow(clippy::unwrap_used)]
    impl CartStorage for MemoryStore {
        fn load(&self, key: &str) -> Option<String> {
            self.get(key)
        }

        fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if *self.fail_saves.lock().unwrap() {
                return Err(StorageError::Io(std::io::Error::other("save disabled")));
            }
            self.set(key, value);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> FileStore {
        let dir = std::env::temp_dir().join(format!(
            "shoebox-storage-test-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let _ = fs::remove_dir_all(&dir);
        FileStore::new(dir)
    }

    #[test]
    fn test_load_missing_key_is_none() {
        let store = temp_store();
        assert_eq!(store.load(CART_KEY), None);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = temp_store();
        store.save(CART_KEY, "[1,2,3]").unwrap();
        assert_eq!(store.load(CART_KEY).as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn test_save_replaces_previous_value() {
        let store = temp_store();
        store.save(CART_KEY, "old").unwrap();
        store.save(CART_KEY, "new").unwrap();
        assert_eq!(store.load(CART_KEY).as_deref(), Some("new"));
    }
}
