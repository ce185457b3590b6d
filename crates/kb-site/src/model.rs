//! Knowledge base documents: metadata catalogue and subject trees.
//!
//! Both document kinds are decoded from JSON once and never mutated. Field
//! names follow the authored files (`dataFile`, `totalSubjects`, ...).

use kb_renderer::ContentBlock;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept either a JSON string or number where authors are inconsistent
/// (versions, section ids).
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Site-wide catalogue loaded once at startup.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub total_subjects: u32,
    #[serde(default)]
    pub total_chapters: u32,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub subjects: Vec<SubjectEntry>,
}

/// Grouping of subjects shown in the sidebar and on the home page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

/// Catalogue entry pointing at a subject document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectEntry {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Path of the subject document, relative to the data root.
    pub data_file: String,
    /// Advertised chapter count, shown as a badge.
    #[serde(default)]
    pub chapters: u32,
}

impl Metadata {
    /// Look up a catalogue entry by subject id.
    #[must_use]
    pub fn subject(&self, id: &str) -> Option<&SubjectEntry> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Look up a category by id.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Subjects belonging to `category_id`, in catalogue order.
    pub fn subjects_in<'a>(
        &'a self,
        category_id: &'a str,
    ) -> impl Iterator<Item = &'a SubjectEntry> + 'a {
        self.subjects.iter().filter(move |s| s.category == category_id)
    }
}

/// One subject document: an ordered list of chapters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Subject {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub chapters: Vec<Chapter>,
}

/// Numbered unit of a subject.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Chapter {
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Titled run of content blocks inside a chapter.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Section {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl Subject {
    /// Chapter at `index`, if in range.
    #[must_use]
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }
}
