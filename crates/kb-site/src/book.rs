//! Reading progress and bookmarks.
//!
//! [`ProgressBook`] is plain in-memory state owned by the navigator session.
//! It is read from a [`KeyValueStore`] once at startup and written back
//! whenever the navigator asks for it. Progress is append-only: a chapter
//! once marked done is never unmarked.

use std::collections::{BTreeMap, BTreeSet};

use kb_store::{KeyValueStore, KeyValueStoreExt};
use serde::{Deserialize, Serialize};

/// Store key holding the progress map.
pub const PROGRESS_KEY: &str = "progress";

/// Store key holding the bookmark list.
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// Completion state of one subject.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgressRecord {
    /// Indices of chapters that have been viewed.
    #[serde(default)]
    pub done: BTreeSet<usize>,
    /// Chapter count of the subject; zero until the subject has been read.
    #[serde(default)]
    pub total: usize,
}

impl ProgressRecord {
    /// Completion as `round(100 * done / total)`, or `None` while `total` is zero.
    #[must_use]
    pub fn percent(&self) -> Option<usize> {
        if self.total == 0 {
            return None;
        }
        let done = self.done.len();
        Some((200 * done + self.total) / (2 * self.total))
    }
}

/// Bookmark reference for a subject index page.
#[must_use]
pub fn subject_ref(subject_id: &str) -> String {
    format!("subject/{subject_id}")
}

/// Bookmark reference for a chapter page.
#[must_use]
pub fn chapter_ref(subject_id: &str, chapter: usize) -> String {
    format!("subject/{subject_id}/chapter/{chapter}")
}

/// Per-subject progress plus an ordered bookmark list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressBook {
    progress: BTreeMap<String, ProgressRecord>,
    bookmarks: Vec<String>,
}

impl ProgressBook {
    /// Empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read both keys from `store`. Missing or unreadable values count as empty.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let progress = store.get_json(PROGRESS_KEY).unwrap_or_default();
        let mut book = Self {
            progress,
            bookmarks: Vec::new(),
        };
        for reference in store.get_json::<Vec<String>>(BOOKMARKS_KEY).unwrap_or_default() {
            book.add_bookmark(&reference);
        }
        book
    }

    /// Write the progress map to `store`.
    pub fn persist_progress(&self, store: &dyn KeyValueStore) {
        store.set_json(PROGRESS_KEY, &self.progress);
    }

    /// Write the bookmark list to `store`.
    pub fn persist_bookmarks(&self, store: &dyn KeyValueStore) {
        store.set_json(BOOKMARKS_KEY, &self.bookmarks);
    }

    /// Record `chapter` of `subject_id` as done and refresh the subject's
    /// chapter total. Returns whether anything changed.
    pub fn mark_done(&mut self, subject_id: &str, chapter: usize, total: usize) -> bool {
        let record = self.progress.entry(subject_id.to_owned()).or_default();
        let inserted = record.done.insert(chapter);
        let resized = record.total != total;
        record.total = total;
        inserted || resized
    }

    /// Progress of `subject_id`, if any chapter was ever viewed.
    #[must_use]
    pub fn record(&self, subject_id: &str) -> Option<&ProgressRecord> {
        self.progress.get(subject_id)
    }

    /// Completion percentage of `subject_id`, see [`ProgressRecord::percent`].
    #[must_use]
    pub fn percent(&self, subject_id: &str) -> Option<usize> {
        self.record(subject_id).and_then(ProgressRecord::percent)
    }

    /// Whether `chapter` of `subject_id` has been viewed.
    #[must_use]
    pub fn is_done(&self, subject_id: &str, chapter: usize) -> bool {
        self.record(subject_id)
            .is_some_and(|r| r.done.contains(&chapter))
    }

    /// Append a bookmark. Returns `false` if it was already present.
    pub fn add_bookmark(&mut self, reference: &str) -> bool {
        if self.has_bookmark(reference) {
            return false;
        }
        self.bookmarks.push(reference.to_owned());
        true
    }

    /// Remove a bookmark. Returns whether it was present.
    pub fn remove_bookmark(&mut self, reference: &str) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b != reference);
        self.bookmarks.len() != before
    }

    /// Bookmarks in insertion order.
    #[must_use]
    pub fn bookmarks(&self) -> &[String] {
        &self.bookmarks
    }

    /// Whether `reference` is bookmarked.
    #[must_use]
    pub fn has_bookmark(&self, reference: &str) -> bool {
        self.bookmarks.iter().any(|b| b == reference)
    }
}
