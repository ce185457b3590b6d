//! Navigation state machine.
//!
//! All session mutation funnels through [`transition`], a pure step from a
//! [`Session`] and an [`Event`] to the next session and a list of
//! [`Effect`]s. Effects describe I/O (fetches, persistence, rendering) for
//! the caller to perform; results of fetches come back in as
//! [`Event::SubjectLoaded`].
//!
//! # Routes
//!
//! ```text
//! Home ──select──▶ (load) ──▶ SubjectIndex(id) ──open──▶ ChapterView(id, i)
//!   ▲                               ▲                         │  ▲
//!   └────────────── home ───────────┴──── back to subject ────┘  └ prev/next
//! ```
//!
//! A subject route is entered only once its document has loaded. A failed
//! load leaves the session as it was and emits [`Effect::ShowError`].
//!
//! # Stale Loads
//!
//! Every route change bumps the session generation, and every load request
//! carries the generation it was issued under. A [`Event::SubjectLoaded`]
//! whose generation is no longer current is dropped, so a slow fetch cannot
//! overwrite a newer navigation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::book::ProgressBook;
use crate::fragment::{Fragment, subject_fragment};
use crate::loader::LoadError;
use crate::model::{Metadata, Subject};

/// Current page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Route {
    Home,
    SubjectIndex { subject: String },
    ChapterView { subject: String, chapter: usize },
}

impl Route {
    /// Subject the route belongs to, if any.
    #[must_use]
    pub fn subject_id(&self) -> Option<&str> {
        match self {
            Self::Home => None,
            Self::SubjectIndex { subject } | Self::ChapterView { subject, .. } => Some(subject),
        }
    }
}

/// Failed subject load, as seen by the navigator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    /// Document path that was attempted.
    pub path: String,
    /// Human-readable cause.
    pub message: String,
}

impl From<&LoadError> for LoadFailure {
    fn from(err: &LoadError) -> Self {
        Self {
            path: err.path().to_owned(),
            message: err.to_string(),
        }
    }
}

/// Input to [`transition`].
///
/// Everything except [`Event::SubjectLoaded`] can arrive from a client as
/// JSON tagged by `kind`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// Explicit "back to home".
    Home,
    /// Subject picked from the sidebar or the home grid.
    SelectSubject { subject: String },
    /// Chapter picked from the current subject's index.
    OpenChapter { index: usize },
    PrevChapter,
    NextChapter,
    /// Breadcrumb from a chapter back to its subject index.
    BackToSubject,
    /// Location fragment set on load or changed externally.
    FragmentChanged { fragment: String },
    ToggleSidebar,
    AddBookmark { reference: String },
    RemoveBookmark { reference: String },
    /// Completion of an [`Effect::LoadSubject`].
    #[serde(skip)]
    SubjectLoaded {
        generation: u64,
        subject: String,
        result: Result<Arc<Subject>, LoadFailure>,
    },
}

/// Work requested by [`transition`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Fetch a subject document, then feed back [`Event::SubjectLoaded`].
    LoadSubject {
        generation: u64,
        subject: String,
        path: String,
    },
    /// Recompose the main region and the sidebar for the current route.
    Render,
    /// Recompose the sidebar only.
    RenderSidebar,
    /// Replace the location fragment (without leading `#`).
    SetFragment(String),
    /// Highlight a subject in the navigation, or home when `None`.
    HighlightNav(Option<String>),
    PersistProgress,
    PersistBookmarks,
    /// Ask the math typesetter to process the main region.
    TypesetMath,
    /// Replace the main region with an inline load error.
    ShowError(LoadFailure),
}

/// Explicit session state. Only [`transition`] produces new sessions.
#[derive(Clone, Debug)]
pub struct Session {
    metadata: Arc<Metadata>,
    route: Route,
    subject: Option<Arc<Subject>>,
    chapter: Option<usize>,
    sidebar_open: bool,
    generation: u64,
    book: ProgressBook,
}

impl Session {
    /// Fresh session on the home route.
    #[must_use]
    pub fn new(metadata: Arc<Metadata>, book: ProgressBook) -> Self {
        Self {
            metadata,
            route: Route::Home,
            subject: None,
            chapter: None,
            sidebar_open: true,
            generation: 0,
            book,
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &Arc<Metadata> {
        &self.metadata
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Subject document backing the current route.
    #[must_use]
    pub fn current_subject(&self) -> Option<&Arc<Subject>> {
        self.subject.as_ref()
    }

    #[must_use]
    pub fn current_chapter(&self) -> Option<usize> {
        self.chapter
    }

    #[must_use]
    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Generation that pending loads must match to be applied.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn book(&self) -> &ProgressBook {
        &self.book
    }

    fn go_home(&mut self) -> Vec<Effect> {
        self.generation += 1;
        self.route = Route::Home;
        self.subject = None;
        self.chapter = None;
        vec![
            Effect::Render,
            Effect::HighlightNav(None),
            Effect::SetFragment(String::new()),
        ]
    }

    fn request_subject(&mut self, id: &str) -> Vec<Effect> {
        let Some(entry) = self.metadata.subject(id) else {
            return Vec::new();
        };
        let path = entry.data_file.clone();
        self.generation += 1;
        vec![Effect::LoadSubject {
            generation: self.generation,
            subject: id.to_owned(),
            path,
        }]
    }

    fn enter_subject(&mut self, id: String, subject: Arc<Subject>) -> Vec<Effect> {
        let fragment = subject_fragment(&id);
        self.route = Route::SubjectIndex {
            subject: id.clone(),
        };
        self.subject = Some(subject);
        self.chapter = None;
        vec![
            Effect::Render,
            Effect::HighlightNav(Some(id)),
            Effect::SetFragment(fragment),
        ]
    }

    fn open_chapter(&mut self, index: usize) -> Vec<Effect> {
        let Some(id) = self.route.subject_id().map(str::to_owned) else {
            return Vec::new();
        };
        let Some(total) = self.subject.as_ref().map(|s| s.chapters.len()) else {
            return Vec::new();
        };
        if index >= total {
            return Vec::new();
        }

        self.generation += 1;
        self.book.mark_done(&id, index, total);
        self.route = Route::ChapterView {
            subject: id.clone(),
            chapter: index,
        };
        self.chapter = Some(index);
        vec![
            Effect::Render,
            Effect::TypesetMath,
            Effect::HighlightNav(Some(id)),
            Effect::PersistProgress,
        ]
    }

    fn back_to_subject(&mut self) -> Vec<Effect> {
        let Route::ChapterView { subject, .. } = &self.route else {
            return Vec::new();
        };
        let id = subject.clone();
        self.generation += 1;
        self.route = Route::SubjectIndex {
            subject: id.clone(),
        };
        self.chapter = None;
        vec![
            Effect::Render,
            Effect::HighlightNav(Some(id.clone())),
            Effect::SetFragment(subject_fragment(&id)),
        ]
    }

    fn fragment_changed(&mut self, fragment: &str) -> Vec<Effect> {
        match Fragment::parse(fragment) {
            Fragment::Home if self.route == Route::Home => Vec::new(),
            Fragment::Home => self.go_home(),
            Fragment::Subject(id) if self.metadata.subject(&id).is_none() => {
                tracing::debug!(subject = %id, "Ignoring fragment for unknown subject");
                if self.route == Route::Home {
                    Vec::new()
                } else {
                    self.go_home()
                }
            }
            Fragment::Subject(id) => {
                let already_there =
                    matches!(&self.route, Route::SubjectIndex { subject } if *subject == id);
                if already_there {
                    Vec::new()
                } else {
                    self.request_subject(&id)
                }
            }
            Fragment::Other => Vec::new(),
        }
    }
}

/// Apply one event to a session.
#[must_use]
pub fn transition(mut session: Session, event: Event) -> (Session, Vec<Effect>) {
    let effects = match event {
        Event::Home => session.go_home(),
        Event::SelectSubject { subject } => session.request_subject(&subject),
        Event::OpenChapter { index } => session.open_chapter(index),
        Event::PrevChapter => match session.route {
            Route::ChapterView { chapter, .. } if chapter > 0 => session.open_chapter(chapter - 1),
            _ => Vec::new(),
        },
        Event::NextChapter => match session.route {
            Route::ChapterView { chapter, .. } => session.open_chapter(chapter + 1),
            _ => Vec::new(),
        },
        Event::BackToSubject => session.back_to_subject(),
        Event::FragmentChanged { fragment } => session.fragment_changed(&fragment),
        Event::ToggleSidebar => {
            session.sidebar_open = !session.sidebar_open;
            vec![Effect::RenderSidebar]
        }
        Event::AddBookmark { reference } => {
            if session.book.add_bookmark(&reference) {
                vec![Effect::PersistBookmarks, Effect::Render]
            } else {
                Vec::new()
            }
        }
        Event::RemoveBookmark { reference } => {
            if session.book.remove_bookmark(&reference) {
                vec![Effect::PersistBookmarks, Effect::Render]
            } else {
                Vec::new()
            }
        }
        Event::SubjectLoaded {
            generation,
            subject,
            result,
        } => {
            if generation != session.generation {
                tracing::debug!(
                    subject = %subject,
                    generation,
                    current = session.generation,
                    "Dropping stale subject load"
                );
                Vec::new()
            } else {
                match result {
                    Ok(document) => session.enter_subject(subject, document),
                    Err(failure) => vec![Effect::ShowError(failure)],
                }
            }
        }
    };
    (session, effects)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn metadata() -> Arc<Metadata> {
        Arc::new(
            serde_json::from_value(json!({
                "categories": [{"id": "ee", "name": "EE"}],
                "subjects": [
                    {"id": "a", "name": "Alpha", "category": "ee", "dataFile": "a.json", "chapters": 3},
                    {"id": "b", "name": "Beta", "category": "ee", "dataFile": "b.json", "chapters": 1}
                ]
            }))
            .unwrap(),
        )
    }

    fn subject(id: &str, chapters: u32) -> Arc<Subject> {
        let chapters: Vec<_> = (1..=chapters)
            .map(|n| json!({"number": n, "title": format!("Chapter {n}")}))
            .collect();
        Arc::new(
            serde_json::from_value(json!({"id": id, "title": id.to_uppercase(), "chapters": chapters}))
                .unwrap(),
        )
    }

    fn session() -> Session {
        Session::new(metadata(), ProgressBook::new())
    }

    /// Apply `event`, answering a single resulting load with `document`.
    fn step(session: Session, event: Event, document: Option<Arc<Subject>>) -> (Session, Vec<Effect>) {
        let (session, effects) = transition(session, event);
        let load = match effects.as_slice() {
            [Effect::LoadSubject { generation, subject, .. }] => Some((*generation, subject.clone())),
            _ => None,
        };
        match (load, document) {
            (Some((generation, subject)), Some(doc)) => transition(
                session,
                Event::SubjectLoaded {
                    generation,
                    subject,
                    result: Ok(doc),
                },
            ),
            _ => (session, effects),
        }
    }

    fn at_chapter(index: usize) -> Session {
        let (s, _) = step(
            session(),
            Event::SelectSubject { subject: "a".to_owned() },
            Some(subject("a", 3)),
        );
        let (s, _) = transition(s, Event::OpenChapter { index });
        s
    }

    #[test]
    fn test_new_session_is_home() {
        let s = session();

        assert_eq!(s.route(), &Route::Home);
        assert!(s.current_subject().is_none());
        assert!(s.sidebar_open());
    }

    #[test]
    fn test_select_subject_requests_load_without_moving() {
        let (s, effects) = transition(session(), Event::SelectSubject { subject: "a".to_owned() });

        assert_eq!(
            effects,
            vec![Effect::LoadSubject {
                generation: 1,
                subject: "a".to_owned(),
                path: "a.json".to_owned(),
            }]
        );
        assert_eq!(s.route(), &Route::Home);
    }

    #[test]
    fn test_select_unknown_subject_is_inert() {
        let (s, effects) = transition(session(), Event::SelectSubject { subject: "zzz".to_owned() });

        assert!(effects.is_empty());
        assert_eq!(s.generation(), 0);
    }

    #[test]
    fn test_subject_loaded_enters_index() {
        let (s, effects) = step(
            session(),
            Event::SelectSubject { subject: "a".to_owned() },
            Some(subject("a", 3)),
        );

        assert_eq!(s.route(), &Route::SubjectIndex { subject: "a".to_owned() });
        assert_eq!(s.current_subject().unwrap().chapters.len(), 3);
        assert_eq!(s.current_chapter(), None);
        assert_eq!(
            effects,
            vec![
                Effect::Render,
                Effect::HighlightNav(Some("a".to_owned())),
                Effect::SetFragment("subject/a".to_owned()),
            ]
        );
    }

    #[test]
    fn test_fragment_resolves_to_subject_index() {
        let (s, _) = step(
            session(),
            Event::FragmentChanged { fragment: "#subject/a".to_owned() },
            Some(subject("a", 3)),
        );

        assert_eq!(s.route(), &Route::SubjectIndex { subject: "a".to_owned() });
    }

    #[test]
    fn test_unknown_fragment_resolves_home() {
        let (s, effects) = transition(
            session(),
            Event::FragmentChanged { fragment: "#subject/zzz".to_owned() },
        );

        assert_eq!(s.route(), &Route::Home);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_unknown_fragment_from_subject_goes_home() {
        let s = at_chapter(1);

        let (s, effects) = transition(s, Event::FragmentChanged { fragment: "#subject/zzz".to_owned() });

        assert_eq!(s.route(), &Route::Home);
        assert!(s.current_subject().is_none());
        assert_eq!(effects[0], Effect::Render);
    }

    #[test]
    fn test_section_anchor_fragment_is_ignored() {
        let s = at_chapter(1);

        let (s, effects) = transition(s, Event::FragmentChanged { fragment: "#sec-1-0".to_owned() });

        assert_eq!(s.route(), &Route::ChapterView { subject: "a".to_owned(), chapter: 1 });
        assert!(effects.is_empty());
    }

    #[test]
    fn test_fragment_for_current_index_is_inert() {
        let (s, _) = step(
            session(),
            Event::SelectSubject { subject: "a".to_owned() },
            Some(subject("a", 3)),
        );

        let (_, effects) = transition(s, Event::FragmentChanged { fragment: "#subject/a".to_owned() });

        assert!(effects.is_empty());
    }

    #[test]
    fn test_open_chapter_marks_progress() {
        let s = at_chapter(2);

        assert_eq!(s.route(), &Route::ChapterView { subject: "a".to_owned(), chapter: 2 });
        assert_eq!(s.current_chapter(), Some(2));
        assert!(s.book().is_done("a", 2));
        assert_eq!(s.book().record("a").unwrap().total, 3);
    }

    #[test]
    fn test_open_chapter_effects() {
        let (s, _) = step(
            session(),
            Event::SelectSubject { subject: "a".to_owned() },
            Some(subject("a", 3)),
        );

        let (_, effects) = transition(s, Event::OpenChapter { index: 0 });

        assert_eq!(
            effects,
            vec![
                Effect::Render,
                Effect::TypesetMath,
                Effect::HighlightNav(Some("a".to_owned())),
                Effect::PersistProgress,
            ]
        );
    }

    #[test]
    fn test_open_chapter_out_of_range_is_inert() {
        let (s, _) = step(
            session(),
            Event::SelectSubject { subject: "a".to_owned() },
            Some(subject("a", 3)),
        );

        let (s, effects) = transition(s, Event::OpenChapter { index: 3 });

        assert!(effects.is_empty());
        assert_eq!(s.route(), &Route::SubjectIndex { subject: "a".to_owned() });
    }

    #[test]
    fn test_open_chapter_from_home_is_inert() {
        let (s, effects) = transition(session(), Event::OpenChapter { index: 0 });

        assert!(effects.is_empty());
        assert_eq!(s.route(), &Route::Home);
    }

    #[test]
    fn test_prev_at_first_chapter_is_inert() {
        let s = at_chapter(0);
        let before = s.generation();

        let (s, effects) = transition(s, Event::PrevChapter);

        assert!(effects.is_empty());
        assert_eq!(s.route(), &Route::ChapterView { subject: "a".to_owned(), chapter: 0 });
        assert_eq!(s.generation(), before);
    }

    #[test]
    fn test_next_at_last_chapter_is_inert() {
        let s = at_chapter(2);

        let (s, effects) = transition(s, Event::NextChapter);

        assert!(effects.is_empty());
        assert_eq!(s.route(), &Route::ChapterView { subject: "a".to_owned(), chapter: 2 });
    }

    #[test]
    fn test_prev_and_next_move_by_one() {
        let s = at_chapter(1);

        let (s, _) = transition(s, Event::NextChapter);
        assert_eq!(s.current_chapter(), Some(2));

        let (s, _) = transition(s, Event::PrevChapter);
        let (s, _) = transition(s, Event::PrevChapter);
        assert_eq!(s.current_chapter(), Some(0));
        assert_eq!(
            s.book().record("a").unwrap().done.iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_back_to_subject_keeps_document() {
        let s = at_chapter(1);
        let doc = Arc::clone(s.current_subject().unwrap());

        let (s, effects) = transition(s, Event::BackToSubject);

        assert_eq!(s.route(), &Route::SubjectIndex { subject: "a".to_owned() });
        assert!(Arc::ptr_eq(s.current_subject().unwrap(), &doc));
        assert_eq!(s.current_chapter(), None);
        assert!(!effects.iter().any(|e| matches!(e, Effect::LoadSubject { .. })));
    }

    #[test]
    fn test_home_clears_subject() {
        let s = at_chapter(1);

        let (s, effects) = transition(s, Event::Home);

        assert_eq!(s.route(), &Route::Home);
        assert!(s.current_subject().is_none());
        assert_eq!(s.current_chapter(), None);
        assert!(effects.contains(&Effect::HighlightNav(None)));
        assert!(effects.contains(&Effect::SetFragment(String::new())));
        assert!(s.book().is_done("a", 1));
    }

    #[test]
    fn test_failed_load_preserves_session() {
        let s = at_chapter(1);
        let doc = Arc::clone(s.current_subject().unwrap());
        let (s, effects) = transition(s, Event::SelectSubject { subject: "b".to_owned() });
        let Effect::LoadSubject { generation, .. } = effects[0] else {
            panic!("expected load");
        };
        let failure = LoadFailure {
            path: "b.json".to_owned(),
            message: "Not found".to_owned(),
        };

        let (s, effects) = transition(
            s,
            Event::SubjectLoaded {
                generation,
                subject: "b".to_owned(),
                result: Err(failure.clone()),
            },
        );

        assert_eq!(effects, vec![Effect::ShowError(failure)]);
        assert!(Arc::ptr_eq(s.current_subject().unwrap(), &doc));
        assert_eq!(s.current_chapter(), Some(1));
        assert_eq!(s.route(), &Route::ChapterView { subject: "a".to_owned(), chapter: 1 });
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let (s, first) = transition(session(), Event::SelectSubject { subject: "a".to_owned() });
        let (s, second) = transition(s, Event::SelectSubject { subject: "b".to_owned() });
        let gen_of = |effects: &[Effect]| match effects {
            [Effect::LoadSubject { generation, .. }] => *generation,
            _ => panic!("expected load"),
        };

        let (s, late) = transition(
            s,
            Event::SubjectLoaded {
                generation: gen_of(&first),
                subject: "a".to_owned(),
                result: Ok(subject("a", 3)),
            },
        );
        assert!(late.is_empty());
        assert_eq!(s.route(), &Route::Home);

        let (s, _) = transition(
            s,
            Event::SubjectLoaded {
                generation: gen_of(&second),
                subject: "b".to_owned(),
                result: Ok(subject("b", 1)),
            },
        );
        assert_eq!(s.route(), &Route::SubjectIndex { subject: "b".to_owned() });
    }

    #[test]
    fn test_home_supersedes_pending_load() {
        let (s, effects) = transition(session(), Event::SelectSubject { subject: "a".to_owned() });
        let Effect::LoadSubject { generation, .. } = effects[0] else {
            panic!("expected load");
        };
        let (s, _) = transition(s, Event::FragmentChanged { fragment: "#subject/b".to_owned() });
        let (s, _) = transition(s, Event::Home);

        let (s, effects) = transition(
            s,
            Event::SubjectLoaded {
                generation,
                subject: "a".to_owned(),
                result: Ok(subject("a", 3)),
            },
        );

        assert!(effects.is_empty());
        assert_eq!(s.route(), &Route::Home);
    }

    #[test]
    fn test_toggle_sidebar() {
        let (s, effects) = transition(session(), Event::ToggleSidebar);
        assert!(!s.sidebar_open());
        assert_eq!(effects, vec![Effect::RenderSidebar]);

        let (s, _) = transition(s, Event::ToggleSidebar);
        assert!(s.sidebar_open());
    }

    #[test]
    fn test_bookmarks() {
        let reference = "subject/a".to_owned();

        let (s, effects) = transition(session(), Event::AddBookmark { reference: reference.clone() });
        assert_eq!(effects, vec![Effect::PersistBookmarks, Effect::Render]);
        assert_eq!(s.book().bookmarks(), [reference.as_str()]);

        let (s, effects) = transition(s, Event::AddBookmark { reference: reference.clone() });
        assert!(effects.is_empty());

        let (s, effects) = transition(s, Event::RemoveBookmark { reference: reference.clone() });
        assert_eq!(effects, vec![Effect::PersistBookmarks, Effect::Render]);
        assert!(s.book().bookmarks().is_empty());

        let (_, effects) = transition(s, Event::RemoveBookmark { reference });
        assert!(effects.is_empty());
    }

    #[test]
    fn test_event_from_client_json() {
        let event: Event =
            serde_json::from_str(r#"{"kind": "select_subject", "subject": "a"}"#).unwrap();
        assert_eq!(event, Event::SelectSubject { subject: "a".to_owned() });

        let event: Event = serde_json::from_str(r#"{"kind": "next_chapter"}"#).unwrap();
        assert_eq!(event, Event::NextChapter);

        assert!(serde_json::from_str::<Event>(r#"{"kind": "subject_loaded"}"#).is_err());
    }

    #[test]
    fn test_route_serializes_with_page_tag() {
        let route = Route::ChapterView { subject: "a".to_owned(), chapter: 2 };

        assert_eq!(
            serde_json::to_value(&route).unwrap(),
            json!({"page": "chapter_view", "subject": "a", "chapter": 2})
        );
    }
}
