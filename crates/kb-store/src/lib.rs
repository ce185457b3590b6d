//! Durable key-value persistence for the KB viewer.
//!
//! This crate provides a small string-keyed store that decouples the
//! progress and bookmark book from where its state lives:
//!
//! - [`KeyValueStore`]: Get/set of string values by key
//! - [`KeyValueStoreExt`]: Typed JSON helpers over any store
//!
//! # Implementations
//!
//! - [`MemoryStore`]: In-process map, lost on exit
//! - [`FileStore`]: One file per key under a directory
//!
//! Writes never fail from the caller's point of view. A backend that cannot
//! persist logs a warning and the caller's in-memory state stays authoritative.
//!
//! # Example
//!
//! ```
//! use kb_store::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("bookmarks", "[]");
//! assert_eq!(store.get("bookmarks").as_deref(), Some("[]"));
//! ```

mod ext;
mod file;

use std::collections::HashMap;
use std::sync::RwLock;

pub use ext::KeyValueStoreExt;
pub use file::FileStore;

/// String-keyed durable storage.
pub trait KeyValueStore: Send + Sync {
    /// Retrieve the value stored under `key`, or `None` if there is none.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);
}

/// In-memory [`KeyValueStore`].
///
/// Used when durable storage is disabled and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }
}
