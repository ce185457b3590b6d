//! Storage trait and error types.
//!
//! Document paths are relative, `/`-separated, and resolved against the
//! backend root: `"metadata.json"`, `"subjects/circuits.json"`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Why a document could not be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    NotFound,
    PermissionDenied,
    /// Path escapes the storage root, is absolute, or is empty.
    InvalidPath,
    Other,
}

impl StorageErrorKind {
    fn from_io(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "Not found",
            Self::PermissionDenied => "Permission denied",
            Self::InvalidPath => "Invalid path",
            Self::Other => "Error",
        })
    }
}

/// Failed document read.
///
/// Formats as `[Backend] Kind: cause (path: p)`.
#[derive(Debug)]
pub struct StorageError {
    pub kind: StorageErrorKind,
    /// Path as the backend saw it; `FsStorage` reports the joined path.
    pub path: PathBuf,
    /// Short backend tag, e.g. `"Fs"` or `"Mock"`.
    pub backend: &'static str,
    source: Option<io::Error>,
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind, backend: &'static str, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            backend,
            source: None,
        }
    }

    /// Classify an I/O failure on `path`.
    #[must_use]
    pub fn from_io(err: io::Error, backend: &'static str, path: impl Into<PathBuf>) -> Self {
        Self {
            kind: StorageErrorKind::from_io(err.kind()),
            path: path.into(),
            backend,
            source: Some(err),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.backend, self.kind)?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        write!(f, " (path: {})", self.path.display())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Read-only access to the document tree.
///
/// Documents are returned as text; decoding is the caller's concern.
pub trait Storage: Send + Sync {
    /// Read the full text of the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the path is invalid or the document
    /// cannot be read.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Whether a readable document exists at `path`. Errors count as absent.
    fn exists(&self, path: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(StorageError: Send, Sync);

    #[test]
    fn test_from_io_classifies_kind() {
        let cases = [
            (io::ErrorKind::NotFound, StorageErrorKind::NotFound),
            (io::ErrorKind::PermissionDenied, StorageErrorKind::PermissionDenied),
            (io::ErrorKind::InvalidData, StorageErrorKind::Other),
        ];
        for (io_kind, expected) in cases {
            let err = StorageError::from_io(io::Error::new(io_kind, "boom"), "Fs", "a.json");
            assert_eq!(err.kind, expected);
            assert!(err.source().is_some());
        }
    }

    #[test]
    fn test_display_without_source() {
        let err = StorageError::new(StorageErrorKind::InvalidPath, "Mock", "../x.json");

        assert_eq!(err.to_string(), "[Mock] Invalid path (path: ../x.json)");
    }

    #[test]
    fn test_display_with_source() {
        let err = StorageError::from_io(
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
            "Fs",
            "data/x.json",
        );

        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (path: data/x.json)"
        );
    }
}
