//! Filesystem storage implementation.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage rooted at a data directory.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use kb_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("data"));
/// assert!(storage.exists("metadata.json"));
/// ```
#[derive(Clone, Debug)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Create a storage reading documents below `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory documents are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate that a path stays inside the storage root.
    ///
    /// Rejects parent directory components (`..`) and absolute paths.
    fn validate_path(path: &str) -> Result<(), StorageError> {
        let escapes = Path::new(path).components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });

        if escapes || path.is_empty() {
            return Err(StorageError::new(StorageErrorKind::InvalidPath, BACKEND, path));
        }
        Ok(())
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        Self::validate_path(path)?;
        let full_path = self.root.join(path);
        tracing::debug!(path = %full_path.display(), "Reading document");
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::from_io(e, BACKEND, &full_path))
    }

    fn exists(&self, path: &str) -> bool {
        Self::validate_path(path).is_ok() && self.root.join(path).is_file()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn storage_with(files: &[(&str, &str)]) -> (tempfile::TempDir, FsStorage) {
        let temp_dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = temp_dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        (temp_dir, storage)
    }

    #[test]
    fn test_read_existing_document() {
        let (_dir, storage) = storage_with(&[("metadata.json", r#"{"version":"1"}"#)]);

        assert_eq!(storage.read("metadata.json").unwrap(), r#"{"version":"1"}"#);
    }

    #[test]
    fn test_read_nested_document() {
        let (_dir, storage) = storage_with(&[("subjects/circuits.json", "{}")]);

        assert_eq!(storage.read("subjects/circuits.json").unwrap(), "{}");
    }

    #[test]
    fn test_read_missing_document() {
        let (_dir, storage) = storage_with(&[]);

        let err = storage.read("missing.json").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, "Fs");
        assert!(err.path.ends_with("missing.json"));
    }

    #[test]
    fn test_read_rejects_parent_dir() {
        let (_dir, storage) = storage_with(&[]);

        let err = storage.read("../secret.json").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_read_rejects_absolute_path() {
        let (_dir, storage) = storage_with(&[]);

        let err = storage.read("/etc/passwd").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_read_rejects_empty_path() {
        let (_dir, storage) = storage_with(&[]);

        assert_eq!(storage.read("").unwrap_err().kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_exists() {
        let (_dir, storage) = storage_with(&[("a.json", "{}"), ("sub/b.json", "{}")]);

        assert!(storage.exists("a.json"));
        assert!(storage.exists("sub/b.json"));
        assert!(!storage.exists("sub"));
        assert!(!storage.exists("c.json"));
        assert!(!storage.exists("../a.json"));
    }
}
