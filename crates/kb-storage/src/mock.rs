//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::storage::{Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores documents in memory, counts reads per path and can be told to
/// fail specific paths.
///
/// # Example
///
/// ```
/// use kb_storage::{MockStorage, Storage, StorageErrorKind};
///
/// let storage = MockStorage::new()
///     .with_content("metadata.json", "{}")
///     .with_failure("broken.json", StorageErrorKind::PermissionDenied);
///
/// assert_eq!(storage.read("metadata.json").unwrap(), "{}");
/// assert!(storage.read("broken.json").is_err());
/// assert_eq!(storage.read_count("metadata.json"), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    contents: RwLock<HashMap<String, String>>,
    failures: RwLock<HashMap<String, StorageErrorKind>>,
    reads: RwLock<HashMap<String, usize>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add content for a path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_content(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Make every read of `path` fail with `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, path: impl Into<String>, kind: StorageErrorKind) -> Self {
        self.failures.write().unwrap().insert(path.into(), kind);
        self
    }

    /// Add or replace content after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) {
        self.contents
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Stop failing reads of `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear_failure(&self, path: &str) {
        self.failures.write().unwrap().remove(path);
    }

    /// Number of `read` calls made for `path`, including failed ones.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn read_count(&self, path: &str) -> usize {
        self.reads.read().unwrap().get(path).copied().unwrap_or(0)
    }

    /// Number of `read` calls made across all paths.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn total_reads(&self) -> usize {
        self.reads.read().unwrap().values().sum()
    }
}

impl Storage for MockStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        *self
            .reads
            .write()
            .unwrap()
            .entry(path.to_owned())
            .or_default() += 1;

        if let Some(kind) = self.failures.read().unwrap().get(path) {
            return Err(StorageError::new(*kind, BACKEND, path));
        }

        self.contents
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound, BACKEND, path))
    }

    fn exists(&self, path: &str) -> bool {
        !self.failures.read().unwrap().contains_key(path)
            && self.contents.read().unwrap().contains_key(path)
    }
}
