//! Effect runner around the navigator.
//!
//! A [`Viewer`] owns one [`Session`] plus the collaborators its effects need:
//! the [`SubjectLoader`], the durable [`KeyValueStore`] and a
//! [`MathTypesetter`]. [`Viewer::handle`] feeds an event through
//! [`transition`], performs the resulting effects in order and folds their
//! output into a [`View`] that hosts can hand to a browser or print.
//!
//! Loads run synchronously, so a load requested by one event is answered
//! before `handle` returns and its [`Event::SubjectLoaded`] is processed in
//! the same call.

use std::collections::VecDeque;
use std::sync::Arc;

use kb_storage::Storage;
use kb_store::KeyValueStore;
use serde::Serialize;

use crate::book::ProgressBook;
use crate::compose::{compose_load_error, compose_main, compose_sidebar};
use crate::loader::{MetadataError, SubjectLoader};
use crate::navigator::{Effect, Event, LoadFailure, Route, Session, transition};
use crate::typeset::MathTypesetter;

/// Name of the page region holding composed content.
pub const MAIN_REGION: &str = "main-content";

/// Rendered state of the page after the last event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct View {
    pub route: Route,
    /// Location fragment, without `#`.
    pub fragment: String,
    /// Markup of the main region.
    pub main: String,
    pub sidebar: String,
    /// Subject highlighted in the navigation; `None` highlights home.
    pub active_nav: Option<String>,
    pub sidebar_open: bool,
    /// Set when the main region was replaced with content that needs math
    /// typesetting.
    pub typeset: bool,
    /// Last subject load failure, until the next full render.
    pub error: Option<LoadFailure>,
}

/// One viewer session with its collaborators.
pub struct Viewer {
    session: Session,
    loader: SubjectLoader,
    store: Arc<dyn KeyValueStore>,
    typesetter: Arc<dyn MathTypesetter>,
    view: View,
}

impl Viewer {
    /// Load metadata from `metadata_path` and restore progress from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] if the metadata document cannot be fetched
    /// or decoded. The session cannot start without it.
    pub fn start(
        storage: Arc<dyn Storage>,
        store: Arc<dyn KeyValueStore>,
        typesetter: Arc<dyn MathTypesetter>,
        metadata_path: &str,
    ) -> Result<Self, MetadataError> {
        let loader = SubjectLoader::new(storage);
        let metadata = Arc::new(loader.load_metadata(metadata_path)?);
        let book = ProgressBook::load(&*store);
        tracing::info!(
            subjects = metadata.subjects.len(),
            categories = metadata.categories.len(),
            bookmarks = book.bookmarks().len(),
            "Viewer started"
        );

        let session = Session::new(metadata, book);
        let view = View {
            route: session.route().clone(),
            fragment: String::new(),
            main: compose_main(&session),
            sidebar: compose_sidebar(&session),
            active_nav: None,
            sidebar_open: session.sidebar_open(),
            typeset: false,
            error: None,
        };

        Ok(Self {
            session,
            loader,
            store,
            typesetter,
            view,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn loader(&self) -> &SubjectLoader {
        &self.loader
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Apply `event` and every event its effects produce.
    pub fn handle(&mut self, event: Event) -> &View {
        self.view.typeset = false;

        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let (session, effects) = transition(self.session.clone(), event);
            self.session = session;
            for effect in effects {
                if let Some(next) = self.apply(effect) {
                    queue.push_back(next);
                }
            }
        }

        self.view.route = self.session.route().clone();
        self.view.sidebar_open = self.session.sidebar_open();
        &self.view
    }

    fn apply(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::LoadSubject {
                generation,
                subject,
                path,
            } => {
                let result = self.loader.load_subject(&subject, &path).map_err(|e| {
                    tracing::warn!(subject = %subject, path = %path, error = %e, "Failed to load subject");
                    LoadFailure::from(&e)
                });
                return Some(Event::SubjectLoaded {
                    generation,
                    subject,
                    result,
                });
            }
            Effect::Render => {
                self.view.main = compose_main(&self.session);
                self.view.sidebar = compose_sidebar(&self.session);
                self.view.error = None;
            }
            Effect::RenderSidebar => self.view.sidebar = compose_sidebar(&self.session),
            Effect::SetFragment(fragment) => self.view.fragment = fragment,
            Effect::HighlightNav(subject) => self.view.active_nav = subject,
            Effect::PersistProgress => self.session.book().persist_progress(&*self.store),
            Effect::PersistBookmarks => self.session.book().persist_bookmarks(&*self.store),
            Effect::TypesetMath => {
                if let Err(e) = self.typesetter.typeset(MAIN_REGION) {
                    tracing::warn!(error = %e, "Math typesetting failed");
                }
                self.view.typeset = true;
            }
            Effect::ShowError(failure) => {
                self.view.main = compose_load_error(&failure);
                self.view.error = Some(failure);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use kb_storage::{MockStorage, StorageErrorKind};
    use kb_store::MemoryStore;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::book::{BOOKMARKS_KEY, PROGRESS_KEY};
    use crate::typeset::{NoopTypesetter, TypesetError};

    static_assertions::assert_impl_all!(View: Send, Sync);
    static_assertions::assert_impl_all!(Viewer: Send);

    const METADATA: &str = r#"{
        "categories": [{"id": "ee", "name": "EE"}],
        "subjects": [
            {"id": "a", "name": "Alpha", "category": "ee", "dataFile": "a.json", "chapters": 2},
            {"id": "x", "name": "Broken", "category": "ee", "dataFile": "x.json"}
        ]
    }"#;

    const SUBJECT_A: &str = r#"{
        "id": "a",
        "title": "Alpha",
        "chapters": [
            {"number": 1, "title": "One", "sections": [
                {"id": 1, "title": "Intro", "content": [{"type": "formula", "latex": "a^2"}]}
            ]},
            {"number": 2, "title": "Two"}
        ]
    }"#;

    #[derive(Default)]
    struct CountingTypesetter {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MathTypesetter for CountingTypesetter {
        fn typeset(&self, region: &str) -> Result<(), TypesetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TypesetError {
                    region: region.to_owned(),
                    message: "boom".to_owned(),
                });
            }
            Ok(())
        }
    }

    fn storage() -> MockStorage {
        MockStorage::new()
            .with_content("metadata.json", METADATA)
            .with_content("a.json", SUBJECT_A)
            .with_failure("x.json", StorageErrorKind::NotFound)
    }

    fn viewer_with(store: Arc<MemoryStore>, typesetter: Arc<dyn MathTypesetter>) -> Viewer {
        Viewer::start(Arc::new(storage()), store, typesetter, "metadata.json").unwrap()
    }

    fn viewer() -> Viewer {
        viewer_with(Arc::new(MemoryStore::new()), Arc::new(NoopTypesetter))
    }

    fn select(subject: &str) -> Event {
        Event::SelectSubject {
            subject: subject.to_owned(),
        }
    }

    #[test]
    fn test_start_renders_home() {
        let viewer = viewer();

        assert_eq!(viewer.view().route, Route::Home);
        assert!(viewer.view().main.contains("home-wrap"));
        assert!(viewer.view().sidebar.contains("sidebar-nav"));
        assert!(!viewer.view().typeset);
    }

    #[test]
    fn test_start_fails_without_metadata() {
        let result = Viewer::start(
            Arc::new(MockStorage::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(NoopTypesetter),
            "metadata.json",
        );

        let Err(err) = result else {
            panic!("expected metadata error");
        };
        assert!(err.to_string().starts_with("Cannot load metadata: "));
    }

    #[test]
    fn test_select_loads_and_renders_subject() {
        let mut viewer = viewer();

        let view = viewer.handle(select("a"));

        assert_eq!(view.route, Route::SubjectIndex { subject: "a".to_owned() });
        assert_eq!(view.fragment, "subject/a");
        assert_eq!(view.active_nav.as_deref(), Some("a"));
        assert!(view.main.contains("subject-title"));
    }

    #[test]
    fn test_open_chapter_typesets_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let typesetter = Arc::new(CountingTypesetter::default());
        let mut viewer = viewer_with(Arc::clone(&store), Arc::clone(&typesetter) as Arc<dyn MathTypesetter>);
        viewer.handle(select("a"));

        let view = viewer.handle(Event::OpenChapter { index: 0 });

        assert!(view.typeset);
        assert!(view.main.contains(r"\[a^2\]"));
        assert_eq!(typesetter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.get(PROGRESS_KEY).as_deref(),
            Some(r#"{"a":{"done":[0],"total":2}}"#)
        );
    }

    #[test]
    fn test_typeset_flag_resets_on_next_event() {
        let mut viewer = viewer();
        viewer.handle(select("a"));
        viewer.handle(Event::OpenChapter { index: 0 });

        let view = viewer.handle(Event::BackToSubject);

        assert!(!view.typeset);
    }

    #[test]
    fn test_typeset_failure_is_swallowed() {
        let typesetter = Arc::new(CountingTypesetter {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let mut viewer = viewer_with(Arc::new(MemoryStore::new()), typesetter);
        viewer.handle(select("a"));

        let view = viewer.handle(Event::OpenChapter { index: 1 });

        assert_eq!(view.route, Route::ChapterView { subject: "a".to_owned(), chapter: 1 });
        assert!(view.typeset);
    }

    #[test]
    fn test_load_failure_shows_inline_error() {
        let mut viewer = viewer();
        viewer.handle(select("a"));

        let view = viewer.handle(select("x"));

        assert_eq!(view.route, Route::SubjectIndex { subject: "a".to_owned() });
        assert!(view.main.contains("File path: x.json"));
        assert_eq!(view.error.as_ref().map(|e| e.path.as_str()), Some("x.json"));
        assert_eq!(view.fragment, "subject/a");
    }

    #[test]
    fn test_render_clears_error() {
        let mut viewer = viewer();
        viewer.handle(select("x"));

        let view = viewer.handle(Event::Home);

        assert!(view.error.is_none());
        assert!(view.main.contains("home-wrap"));
    }

    #[test]
    fn test_bookmarks_persist_and_restore() {
        let store = Arc::new(MemoryStore::new());
        let mut viewer = viewer_with(Arc::clone(&store), Arc::new(NoopTypesetter));

        let view = viewer.handle(Event::AddBookmark {
            reference: "subject/a".to_owned(),
        });
        assert!(view.sidebar.contains("bookmark-link"));
        assert_eq!(store.get(BOOKMARKS_KEY).as_deref(), Some(r#"["subject/a"]"#));

        let restored = viewer_with(store, Arc::new(NoopTypesetter));
        assert_eq!(restored.session().book().bookmarks(), ["subject/a"]);
    }

    #[test]
    fn test_toggle_sidebar_keeps_main() {
        let mut viewer = viewer();
        let main = viewer.view().main.clone();

        let view = viewer.handle(Event::ToggleSidebar);

        assert!(!view.sidebar_open);
        assert!(view.sidebar.contains(r#"aria-expanded="false""#));
        assert_eq!(view.main, main);
    }

    #[test]
    fn test_view_serializes() {
        let viewer = viewer();

        let json = serde_json::to_value(viewer.view()).unwrap();

        assert_eq!(json["route"]["page"], "home");
        assert_eq!(json["fragment"], "");
        assert_eq!(json["sidebar_open"], true);
        assert!(json["error"].is_null());
    }
}
