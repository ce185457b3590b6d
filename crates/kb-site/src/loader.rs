//! Document loading with a per-session subject cache.
//!
//! [`SubjectLoader`] fetches documents through a [`Storage`] backend and
//! memoizes subject documents by id. A subject is fetched at most once per
//! loader; later requests for the same id return the cached [`Arc`] without
//! touching storage. There is no invalidation.

use std::collections::HashMap;
use std::sync::Arc;

use kb_storage::{Storage, StorageError};
use serde::de::DeserializeOwned;

use crate::model::{Metadata, Subject};

/// Error returned when a document cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Document missing or unreadable.
    #[error("Failed to fetch {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: StorageError,
    },
    /// Document does not have the expected shape.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Path of the document that failed to load.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Fetch { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

/// Metadata could not be loaded. Fatal for a viewer session.
#[derive(Debug, thiserror::Error)]
#[error("Cannot load metadata: {0}")]
pub struct MetadataError(#[from] pub LoadError);

/// Loads metadata and subject documents, caching subjects by id.
pub struct SubjectLoader {
    storage: Arc<dyn Storage>,
    subjects: HashMap<String, Arc<Subject>>,
}

impl SubjectLoader {
    /// Create a loader with an empty cache.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            subjects: HashMap::new(),
        }
    }

    /// Backend documents are read from.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Fetch and decode the metadata document. Not cached.
    pub fn load_metadata(&self, path: &str) -> Result<Metadata, MetadataError> {
        Ok(self.fetch(path)?)
    }

    /// Return the subject with `id`, fetching it from `path` on first use.
    ///
    /// Failed loads are not cached; the next call retries the fetch.
    pub fn load_subject(&mut self, id: &str, path: &str) -> Result<Arc<Subject>, LoadError> {
        if let Some(subject) = self.subjects.get(id) {
            tracing::debug!(subject = %id, "Subject cache hit");
            return Ok(Arc::clone(subject));
        }

        let subject: Arc<Subject> = Arc::new(self.fetch(path)?);
        tracing::info!(subject = %id, path = %path, chapters = subject.chapters.len(), "Loaded subject");
        self.subjects.insert(id.to_owned(), Arc::clone(&subject));
        Ok(subject)
    }

    /// Cached subject, without fetching.
    #[must_use]
    pub fn cached(&self, id: &str) -> Option<Arc<Subject>> {
        self.subjects.get(id).cloned()
    }

    /// Fetch and decode a document without touching the cache.
    pub fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, LoadError> {
        let text = self.storage.read(path).map_err(|source| LoadError::Fetch {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LoadError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    static_assertions::assert_impl_all!(super::SubjectLoader: Send, Sync);

    use kb_storage::{MockStorage, StorageErrorKind};
    use pretty_assertions::assert_eq;

    use super::*;

    const SUBJECT: &str = r#"{"id": "a", "title": "A", "chapters": [{"number": 1, "title": "One"}]}"#;

    fn loader_with(storage: MockStorage) -> (Arc<MockStorage>, SubjectLoader) {
        let storage = Arc::new(storage);
        let loader = SubjectLoader::new(Arc::clone(&storage) as Arc<dyn Storage>);
        (storage, loader)
    }

    #[test]
    fn test_load_subject_fetches_once() {
        let (storage, mut loader) = loader_with(MockStorage::new().with_content("a.json", SUBJECT));

        let first = loader.load_subject("a", "a.json").unwrap();
        let second = loader.load_subject("a", "a.json").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(storage.read_count("a.json"), 1);
    }

    #[test]
    fn test_cache_keyed_by_id_not_path() {
        let (storage, mut loader) = loader_with(MockStorage::new().with_content("a.json", SUBJECT));

        loader.load_subject("a", "a.json").unwrap();
        loader.load_subject("a", "other.json").unwrap();

        assert_eq!(storage.total_reads(), 1);
    }

    #[test]
    fn test_fetch_failure_carries_path() {
        let (_, mut loader) = loader_with(
            MockStorage::new().with_failure("x.json", StorageErrorKind::PermissionDenied),
        );

        let err = loader.load_subject("x", "x.json").unwrap_err();

        assert!(matches!(err, LoadError::Fetch { .. }));
        assert_eq!(err.path(), "x.json");
        assert!(loader.cached("x").is_none());
    }

    #[test]
    fn test_parse_failure_carries_path() {
        let (_, mut loader) = loader_with(MockStorage::new().with_content("bad.json", r#"{"id": 1}"#));

        let err = loader.load_subject("bad", "bad.json").unwrap_err();

        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().starts_with("Failed to parse bad.json"));
    }

    #[test]
    fn test_failed_load_is_retried() {
        let (storage, mut loader) = loader_with(MockStorage::new());

        assert!(loader.load_subject("a", "a.json").is_err());
        storage.insert("a.json", SUBJECT);
        let subject = loader.load_subject("a", "a.json").unwrap();

        assert_eq!(subject.title, "A");
        assert_eq!(storage.read_count("a.json"), 2);
    }

    #[test]
    fn test_load_metadata() {
        let (_, loader) = loader_with(MockStorage::new().with_content(
            "metadata.json",
            r#"{"version": "1", "subjects": [], "categories": []}"#,
        ));

        let meta = loader.load_metadata("metadata.json").unwrap();

        assert_eq!(meta.version, "1");
    }

    #[test]
    fn test_load_metadata_missing() {
        let (_, loader) = loader_with(MockStorage::new());

        let err = loader.load_metadata("metadata.json").unwrap_err();

        assert_eq!(err.0.path(), "metadata.json");
        assert!(err.to_string().starts_with("Cannot load metadata"));
    }
}
