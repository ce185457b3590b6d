//! Subject-name filtering for the sidebar and the home search box.
//!
//! Matching is a case-insensitive substring test against subject names.
//! Content is not indexed.

use crate::model::{Metadata, SubjectEntry};

/// Minimum trimmed length of a home search query.
pub const MIN_QUERY_CHARS: usize = 2;

/// Whether `entry` matches an already-normalized query.
fn matches(entry: &SubjectEntry, needle: &str) -> bool {
    needle.is_empty() || entry.name.to_lowercase().contains(needle)
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Subjects whose name contains `query`, in catalogue order.
///
/// An empty (or whitespace) query matches every subject.
#[must_use]
pub fn filter_subjects<'a>(metadata: &'a Metadata, query: &str) -> Vec<&'a SubjectEntry> {
    let needle = normalize(query);
    metadata
        .subjects
        .iter()
        .filter(|s| matches(s, &needle))
        .collect()
}

/// Home search: like [`filter_subjects`], but queries shorter than
/// [`MIN_QUERY_CHARS`] are ignored and yield `None`.
#[must_use]
pub fn search<'a>(metadata: &'a Metadata, query: &str) -> Option<Vec<&'a SubjectEntry>> {
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        return None;
    }
    Some(filter_subjects(metadata, query))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn metadata() -> Metadata {
        serde_json::from_value(json!({
            "subjects": [
                {"id": "circuits", "name": "Circuit Theory", "category": "ee", "dataFile": "c.json"},
                {"id": "signals", "name": "Signals & Systems", "category": "ee", "dataFile": "s.json"},
                {"id": "thermo", "name": "Thermodynamics", "category": "me", "dataFile": "t.json"}
            ]
        }))
        .unwrap()
    }

    fn ids(entries: &[&SubjectEntry]) -> Vec<String> {
        entries.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_filter_case_insensitive() {
        let meta = metadata();

        assert_eq!(ids(&filter_subjects(&meta, "THEORY")), vec!["circuits"]);
        assert_eq!(ids(&filter_subjects(&meta, "  sys ")), vec!["signals"]);
    }

    #[test]
    fn test_filter_empty_matches_all() {
        let meta = metadata();

        assert_eq!(filter_subjects(&meta, "").len(), 3);
        assert_eq!(filter_subjects(&meta, "   ").len(), 3);
    }

    #[test]
    fn test_filter_preserves_order() {
        let meta = metadata();

        assert_eq!(ids(&filter_subjects(&meta, "t")), vec!["circuits", "signals", "thermo"]);
    }

    #[test]
    fn test_filter_no_match() {
        assert!(filter_subjects(&metadata(), "quantum").is_empty());
    }

    #[test]
    fn test_search_ignores_short_queries() {
        let meta = metadata();

        assert_eq!(search(&meta, ""), None);
        assert_eq!(search(&meta, " t "), None);
        assert_eq!(search(&meta, "é").map(|r| r.len()), None);
        assert_eq!(search(&meta, "th").map(|r| ids(&r)), Some(vec!["circuits".to_owned(), "thermo".to_owned()]));
    }
}
