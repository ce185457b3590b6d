//! Content block model and HTML rendering for the KB viewer.
//!
//! This crate provides:
//! - [`ContentBlock`]: Sum type over every block variant a section may contain
//! - [`render`]: Pure dispatcher from a block to its HTML fragment
//!
//! # Architecture
//!
//! Blocks arrive as JSON objects discriminated by a `type` tag. Decoding never
//! fails on the block level: an unrecognized tag becomes
//! [`ContentBlock::Unknown`] and a recognized tag with an undecodable payload
//! becomes [`ContentBlock::Malformed`]. Both render as visible placeholders so
//! a single bad block cannot blank a page.
//!
//! Every payload field is optional. Absent fields render as empty.
//!
//! # Trusted Content
//!
//! Prose fields carry authored HTML and are emitted verbatim, without escaping.
//! Content files are first-party; only diagnostic text produced by this crate
//! (placeholder tags and messages) is escaped.
//!
//! # Math
//!
//! `latex` payloads are passed through untouched inside display-math
//! delimiters (`\[` ... `\]`). Typesetting happens later, outside this crate.
//!
//! # Example
//!
//! ```
//! use kb_renderer::{ContentBlock, render};
//!
//! let block: ContentBlock =
//!     serde_json::from_str(r#"{"type": "formula", "latex": "E = mc^2"}"#).unwrap();
//! let html = render(&block);
//! assert!(html.contains(r"\[E = mc^2\]"));
//! ```

mod block;
mod html;
mod util;

pub use block::{
    Admonition, Analogy, BlockKind, Callout, Compare, CompareSide, ContentBlock, Definition,
    Example, Formula, FormulaGrid, FormulaGridItem, NoteCard, Proof, ProofStep, RawHtml, Scalar,
    StepItem, Steps, Table, Theorem,
};
pub use html::{DEFAULT_GRID_COLUMNS, callout_icon, render, render_all, render_into};
pub use util::{escape_html, math_display};
