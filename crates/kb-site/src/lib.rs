//! Knowledge base viewer core.
//!
//! This crate provides:
//! - [`Metadata`] and [`Subject`]: The catalogue and per-subject documents
//! - [`SubjectLoader`]: Document fetching with a per-session subject cache
//! - [`ProgressBook`]: Chapter progress and bookmarks, persisted through a
//!   [`kb_store::KeyValueStore`]
//! - [`transition`]: The navigator, a pure `(Session, Event) -> (Session, Effects)` step
//! - Page composition for every route ([`compose_main`], [`compose_sidebar`])
//! - [`Viewer`]: Runs navigator effects against real collaborators
//!
//! # Architecture
//!
//! ```text
//! Event ──▶ transition ──▶ Effects ──▶ Viewer ──┬─▶ SubjectLoader ──▶ Storage
//!              ▲                                ├─▶ ProgressBook ───▶ KeyValueStore
//!              └──── SubjectLoaded ◀────────────┼─▶ compose_* ──────▶ View
//!                                               └─▶ MathTypesetter
//! ```
//!
//! The navigator never performs I/O. Hosts (the HTTP server, the CLI) only
//! talk to a [`Viewer`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use kb_site::{Event, NoopTypesetter, Route, Viewer};
//! use kb_storage::MockStorage;
//! use kb_store::MemoryStore;
//!
//! let storage = MockStorage::new()
//!     .with_content("metadata.json", r#"{"subjects": [
//!         {"id": "a", "name": "Alpha", "category": "c", "dataFile": "a.json"}
//!     ]}"#)
//!     .with_content("a.json", r#"{"id": "a", "title": "Alpha", "chapters": []}"#);
//!
//! let mut viewer = Viewer::start(
//!     Arc::new(storage),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(NoopTypesetter),
//!     "metadata.json",
//! )
//! .unwrap();
//!
//! let view = viewer.handle(Event::FragmentChanged { fragment: "#subject/a".into() });
//! assert_eq!(view.route, Route::SubjectIndex { subject: "a".into() });
//! ```

mod book;
mod compose;
mod fragment;
mod loader;
mod model;
mod navigator;
mod search;
mod typeset;
mod validate;
mod viewer;

pub use book::{
    BOOKMARKS_KEY, PROGRESS_KEY, ProgressBook, ProgressRecord, chapter_ref, subject_ref,
};
pub use compose::{
    HOME_PREVIEW, compose_chapter, compose_fatal, compose_home, compose_load_error, compose_main,
    compose_search_results, compose_sidebar, compose_subject,
};
pub use fragment::{Fragment, section_anchor, subject_fragment};
pub use loader::{LoadError, MetadataError, SubjectLoader};
pub use model::{Category, Chapter, Metadata, Section, Subject, SubjectEntry};
pub use navigator::{Effect, Event, LoadFailure, Route, Session, transition};
pub use search::{MIN_QUERY_CHARS, filter_subjects, search};
pub use typeset::{MathTypesetter, NoopTypesetter, TypesetError};
pub use validate::{Violation, validate};
pub use viewer::{MAIN_REGION, View, Viewer};
