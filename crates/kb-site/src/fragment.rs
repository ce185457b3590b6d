//! URL fragment protocol.
//!
//! Only two shapes are recognized: empty (or a bare `#`) for home and
//! `subject/<id>` for a subject index. Anything else, including in-page
//! section anchors, is [`Fragment::Other`] and leaves navigation alone.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped when an id is written into a fragment.
const FRAGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// Parsed location fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// `""` or `"#"`.
    Home,
    /// `subject/<id>`, id percent-decoded.
    Subject(String),
    /// Any other fragment.
    Other,
}

impl Fragment {
    /// Parse a fragment, with or without its leading `#`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('#').unwrap_or(raw);
        if raw.is_empty() {
            return Self::Home;
        }

        let mut parts = raw.split('/');
        match (parts.next(), parts.next()) {
            (Some("subject"), Some(id)) if !id.is_empty() => {
                Self::Subject(percent_decode_str(id).decode_utf8_lossy().into_owned())
            }
            _ => Self::Other,
        }
    }
}

/// Fragment for a subject index page, without the leading `#`.
#[must_use]
pub fn subject_fragment(subject_id: &str) -> String {
    format!(
        "subject/{}",
        utf8_percent_encode(subject_id, FRAGMENT_ENCODE_SET)
    )
}

/// Id of a section anchor inside a rendered chapter.
#[must_use]
pub fn section_anchor(chapter: usize, section: usize) -> String {
    format!("sec-{chapter}-{section}")
}
