//! Content block sum type and its lenient JSON decoding.
//!
//! Each variant of [`ContentBlock`] owns a payload struct whose fields are all
//! optional. Decoding goes through [`serde_json::Value`] so that the `type`
//! tag can be inspected before the payload is decoded; this is what lets
//! unknown or broken blocks degrade instead of failing the whole document.

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Field holding the variant discriminant.
const TAG_FIELD: &str = "type";

/// Decode `null` the same as an absent field.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scalar value used where authors write either text or numbers
/// (table cells, list items, step numbers).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Text, possibly containing inline markup.
    Text(String),
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Float(f64),
    /// Boolean literal.
    Bool(bool),
    /// `null`, rendered as nothing.
    Null,
}

impl Scalar {
    /// Whether the value counts as unset: `null`, `""`, `0` or `false`.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Integer(n) => *n == 0,
            Self::Float(n) => n.abs() < f64::EPSILON,
            Self::Bool(b) => !b,
            Self::Null => true,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => Ok(()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// Discriminant of the recognized block variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    NoteCard,
    Formula,
    FormulaGrid,
    Proof,
    Table,
    Analogy,
    Example,
    Definition,
    Theorem,
    Warning,
    Tip,
    Compare,
    Steps,
    Callout,
    RawHtml,
}

impl BlockKind {
    /// All recognized kinds, in authoring-guide order.
    pub const ALL: [Self; 15] = [
        Self::NoteCard,
        Self::Formula,
        Self::FormulaGrid,
        Self::Proof,
        Self::Table,
        Self::Analogy,
        Self::Example,
        Self::Definition,
        Self::Theorem,
        Self::Warning,
        Self::Tip,
        Self::Compare,
        Self::Steps,
        Self::Callout,
        Self::RawHtml,
    ];

    /// Canonical `type` tag for this kind.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::NoteCard => "note-card",
            Self::Formula => "formula",
            Self::FormulaGrid => "formula-grid",
            Self::Proof => "proof",
            Self::Table => "table",
            Self::Analogy => "analogy",
            Self::Example => "example",
            Self::Definition => "definition",
            Self::Theorem => "theorem",
            Self::Warning => "warning",
            Self::Tip => "tip",
            Self::Compare => "compare",
            Self::Steps => "steps",
            Self::Callout => "callout",
            Self::RawHtml => "raw-html",
        }
    }

    /// Resolve a `type` tag. `html` is accepted as a legacy spelling of `raw-html`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag == "html" {
            return Some(Self::RawHtml);
        }
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// `note-card`: labelled note with optional extra CSS class.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NoteCard {
    pub class: Option<String>,
    pub label: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// `formula`: a single display formula.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Formula {
    pub name: Option<String>,
    pub latex: Option<String>,
    pub description: Option<String>,
    pub note: Option<String>,
}

/// One cell of a `formula-grid`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormulaGridItem {
    pub name: Option<String>,
    pub latex: Option<String>,
    pub desc: Option<String>,
}

/// `formula-grid`: formulas laid out in `cols` columns.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormulaGrid {
    pub title: Option<String>,
    /// Column count. Absent or zero means the default of 2.
    pub cols: Option<u32>,
    #[serde(deserialize_with = "null_to_default")]
    pub items: Vec<FormulaGridItem>,
}

/// One step of a `proof`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProofStep {
    /// Plain prose step, rendered without a number.
    Text(String),
    /// Structured step with an optional label and formula.
    Detailed {
        #[serde(default, alias = "label")]
        step: Option<String>,
        #[serde(default, alias = "formula")]
        latex: Option<String>,
    },
}

/// `proof`: ordered derivation closed by a QED mark.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Proof {
    pub title: Option<String>,
    #[serde(deserialize_with = "null_to_default")]
    pub steps: Vec<ProofStep>,
}

/// `table`: header row plus data rows.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Table {
    pub title: Option<String>,
    #[serde(deserialize_with = "null_to_default")]
    pub headers: Vec<Scalar>,
    #[serde(deserialize_with = "null_to_default")]
    pub rows: Vec<Vec<Scalar>>,
}

/// `analogy`: intuition box with an emoji.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Analogy {
    pub emoji: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// `example`: worked problem with collapsible solution.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Example {
    pub title: Option<String>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub answer: Option<String>,
}

/// `definition`: term with optional formula and explanation.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Definition {
    pub term: Option<String>,
    pub latex: Option<String>,
    pub body: Option<String>,
}

/// `theorem`: named statement with collapsible proof.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theorem {
    pub name: Option<String>,
    pub statement: Option<String>,
    pub latex: Option<String>,
    pub proof: Option<String>,
}

/// Payload shared by `warning` and `tip`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Admonition {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// One side of a `compare` block.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompareSide {
    pub label: Option<String>,
    #[serde(deserialize_with = "null_to_default")]
    pub items: Vec<Scalar>,
}

/// `compare`: two labelled lists side by side.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Compare {
    pub title: Option<String>,
    pub left: Option<CompareSide>,
    pub right: Option<CompareSide>,
}

/// One item of a `steps` block.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StepItem {
    /// Explicit step number. Falls back to the 1-based position.
    pub num: Option<Scalar>,
    pub label: Option<String>,
    pub body: Option<String>,
    pub latex: Option<String>,
}

/// `steps`: numbered procedure.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Steps {
    pub title: Option<String>,
    #[serde(deserialize_with = "null_to_default")]
    pub steps: Vec<StepItem>,
}

/// `callout`: highlighted box whose icon depends on `variant`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Callout {
    pub variant: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// `raw-html`: markup emitted verbatim.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawHtml {
    pub body: Option<String>,
}

/// A single unit of section content.
///
/// Blocks have no identity beyond their position in a section. They are
/// decoded once with the subject document and rendered from scratch on every
/// navigation.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentBlock {
    NoteCard(NoteCard),
    Formula(Formula),
    FormulaGrid(FormulaGrid),
    Proof(Proof),
    Table(Table),
    Analogy(Analogy),
    Example(Example),
    Definition(Definition),
    Theorem(Theorem),
    Warning(Admonition),
    Tip(Admonition),
    Compare(Compare),
    Steps(Steps),
    Callout(Callout),
    RawHtml(RawHtml),
    /// Block whose tag is not recognized (or missing, in which case `tag` is empty).
    Unknown { tag: String },
    /// Block with a recognized tag whose payload could not be decoded.
    Malformed { tag: String, message: String },
}

impl ContentBlock {
    /// Decode a block from a raw JSON value. Never fails.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let tag = match value.get(TAG_FIELD) {
            Some(Value::String(tag)) => tag.clone(),
            _ => return Self::Unknown { tag: String::new() },
        };

        let Some(kind) = BlockKind::from_tag(&tag) else {
            return Self::Unknown { tag };
        };

        match Self::decode(kind, value) {
            Ok(block) => block,
            Err(e) => Self::Malformed {
                tag,
                message: e.to_string(),
            },
        }
    }

    fn decode(kind: BlockKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            BlockKind::NoteCard => Self::NoteCard(serde_json::from_value(value)?),
            BlockKind::Formula => Self::Formula(serde_json::from_value(value)?),
            BlockKind::FormulaGrid => Self::FormulaGrid(serde_json::from_value(value)?),
            BlockKind::Proof => Self::Proof(serde_json::from_value(value)?),
            BlockKind::Table => Self::Table(serde_json::from_value(value)?),
            BlockKind::Analogy => Self::Analogy(serde_json::from_value(value)?),
            BlockKind::Example => Self::Example(serde_json::from_value(value)?),
            BlockKind::Definition => Self::Definition(serde_json::from_value(value)?),
            BlockKind::Theorem => Self::Theorem(serde_json::from_value(value)?),
            BlockKind::Warning => Self::Warning(serde_json::from_value(value)?),
            BlockKind::Tip => Self::Tip(serde_json::from_value(value)?),
            BlockKind::Compare => Self::Compare(serde_json::from_value(value)?),
            BlockKind::Steps => Self::Steps(serde_json::from_value(value)?),
            BlockKind::Callout => Self::Callout(serde_json::from_value(value)?),
            BlockKind::RawHtml => Self::RawHtml(serde_json::from_value(value)?),
        })
    }

    /// Recognized kind, or `None` for unknown and malformed blocks.
    #[must_use]
    pub fn kind(&self) -> Option<BlockKind> {
        Some(match self {
            Self::NoteCard(_) => BlockKind::NoteCard,
            Self::Formula(_) => BlockKind::Formula,
            Self::FormulaGrid(_) => BlockKind::FormulaGrid,
            Self::Proof(_) => BlockKind::Proof,
            Self::Table(_) => BlockKind::Table,
            Self::Analogy(_) => BlockKind::Analogy,
            Self::Example(_) => BlockKind::Example,
            Self::Definition(_) => BlockKind::Definition,
            Self::Theorem(_) => BlockKind::Theorem,
            Self::Warning(_) => BlockKind::Warning,
            Self::Tip(_) => BlockKind::Tip,
            Self::Compare(_) => BlockKind::Compare,
            Self::Steps(_) => BlockKind::Steps,
            Self::Callout(_) => BlockKind::Callout,
            Self::RawHtml(_) => BlockKind::RawHtml,
            Self::Unknown { .. } | Self::Malformed { .. } => return None,
        })
    }

    /// Whether the block carries math that needs typesetting after insertion.
    #[must_use]
    pub fn has_math(&self) -> bool {
        match self {
            Self::Formula(_) | Self::FormulaGrid(_) => true,
            Self::Proof(p) => p
                .steps
                .iter()
                .any(|s| matches!(s, ProofStep::Detailed { latex: Some(_), .. })),
            Self::Definition(d) => d.latex.is_some(),
            Self::Theorem(t) => t.latex.is_some(),
            Self::Steps(s) => s.steps.iter().any(|item| item.latex.is_some()),
            _ => false,
        }
    }
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}
