//! File-based store implementation.
//!
//! [`FileStore`] keeps each key in its own file under a root directory:
//!
//! ```text
//! {root}/
//! +-- progress.json
//! +-- bookmarks.json
//! ```
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! crash mid-write leaves the previous value intact.

use std::fs;
use std::path::{Path, PathBuf};

use crate::KeyValueStore;

/// Extension appended to every key file.
const EXTENSION: &str = "json";

/// File-based [`KeyValueStore`] rooted at a directory on disk.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory holding the key files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`, or `None` if the key is not a plain file name.
    fn key_path(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            tracing::warn!(key, "Rejecting store key that is not a plain name");
            return None;
        }
        Some(self.root.join(format!("{key}.{EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read stored value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        let Some(path) = self.key_path(key) else {
            return;
        };

        if let Err(e) = fs::create_dir_all(&self.root) {
            tracing::warn!(path = %self.root.display(), error = %e, "Failed to create store directory");
            return;
        }

        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        if let Err(e) = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path)) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to persist value");
            let _ = fs::remove_file(&tmp);
        }
    }
}
