//! Metadata consistency checks.
//!
//! [`validate`] walks the whole catalogue and reports every problem it finds
//! rather than stopping at the first one.

use std::collections::HashSet;

use crate::loader::SubjectLoader;
use crate::model::{Metadata, Subject};

/// One problem found in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("Subject '{subject}' references unknown category '{category}'")]
    UnknownCategory { subject: String, category: String },
    #[error("Subject id '{id}' is listed more than once")]
    DuplicateSubjectId { id: String },
    #[error("Subject '{subject}' data file {path} cannot be loaded: {error}")]
    UnloadableDataFile {
        subject: String,
        path: String,
        error: String,
    },
}

/// Check `metadata` against its categories and the documents it points at.
///
/// Every listed `dataFile` is fetched and decoded once, bypassing the
/// loader's subject cache.
#[must_use]
pub fn validate(metadata: &Metadata, loader: &SubjectLoader) -> Vec<Violation> {
    let categories: HashSet<&str> = metadata.categories.iter().map(|c| c.id.as_str()).collect();
    let mut seen = HashSet::new();
    let mut violations = Vec::new();

    for entry in &metadata.subjects {
        if !seen.insert(entry.id.as_str()) {
            violations.push(Violation::DuplicateSubjectId {
                id: entry.id.clone(),
            });
        }
        if !categories.contains(entry.category.as_str()) {
            violations.push(Violation::UnknownCategory {
                subject: entry.id.clone(),
                category: entry.category.clone(),
            });
        }
        if let Err(e) = loader.fetch::<Subject>(&entry.data_file) {
            violations.push(Violation::UnloadableDataFile {
                subject: entry.id.clone(),
                path: entry.data_file.clone(),
                error: e.to_string(),
            });
        }
    }

    tracing::debug!(
        subjects = metadata.subjects.len(),
        violations = violations.len(),
        "Validated metadata"
    );
    violations
}
