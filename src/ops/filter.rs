use serde::{Deserialize, Serialize};

use crate::model::catalog::{ALL_TAG, Catalog};
use crate::model::entry::Entry;

/// Current query text and tag selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub active_tag: String,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            query: String::new(),
            active_tag: ALL_TAG.to_string(),
        }
    }
}

impl FilterState {
    pub fn new(query: &str, active_tag: &str) -> Self {
        FilterState {
            query: query.to_string(),
            active_tag: active_tag.to_string(),
        }
    }

    /// True when the state narrows the catalog at all
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || self.active_tag != ALL_TAG
    }
}

/// Whether `entry` matches the (already trimmed, lowercased) query
fn matches_query(entry: &Entry, needle: &str) -> bool {
    needle.is_empty()
        || entry.title.to_lowercase().contains(needle)
        || entry.summary.to_lowercase().contains(needle)
        || entry.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

fn matches_tag(entry: &Entry, tag: &str) -> bool {
    tag == ALL_TAG || entry.has_tag(tag)
}

/// Indices of the entries visible under `state`, in catalog order.
pub fn filter_entries(catalog: &Catalog, state: &FilterState) -> Vec<usize> {
    let needle = state.query.trim().to_lowercase();
    catalog
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| matches_query(e, &needle) && matches_tag(e, &state.active_tag))
        .map(|(i, _)| i)
        .collect()
}

/// `filter_entries` with the last result memoized by filter state.
#[derive(Debug, Default)]
pub struct FilterEngine {
    last: Option<(FilterState, Vec<usize>)>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, catalog: &Catalog, state: &FilterState) -> &[usize] {
        let hit = matches!(&self.last, Some((cached, _)) if cached == state);
        if !hit {
            let result = filter_entries(catalog, state);
            tracing::debug!(
                query = %state.query,
                tag = %state.active_tag,
                visible = result.len(),
                "filter applied"
            );
            self.last = Some((state.clone(), result));
        }
        self.last.as_ref().map(|(_, r)| r.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::Profile;
    use crate::model::entry::EntryLink;

    fn entry(title: &str, summary: &str, tags: &[&str]) -> Entry {
        Entry {
            title: title.into(),
            year: "2025".into(),
            summary: summary.into(),
            details: "long text that is never searched".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            primary_tag: tags[0].into(),
            links: vec![EntryLink::detail("Details")],
        }
    }

    fn sample() -> Catalog {
        Catalog::new(
            Profile::default(),
            vec![
                entry("Ozark (LMS Dashboard)", "Modern React dashboard", &["React", "UI/UX", "Dashboard"]),
                entry("Liberty Pursuit", "GTA-style web game UI", &["JavaScript", "UI/UX", "3D"]),
                entry("HR Management & Payroll System", "Payroll operations", &["Java", "JavaFX", "MVC"]),
                entry("Rickby (AI Voice Calling Bot)", "Outbound calling flows", &["Python", "Automation"]),
                entry("Side Tool", "Quick Java helper", &["Java"]),
            ],
            vec![],
        )
    }

    fn titles(catalog: &Catalog, idx: &[usize]) -> Vec<String> {
        idx.iter()
            .map(|&i| catalog.entries()[i].title.clone())
            .collect()
    }

    #[test]
    fn empty_query_and_all_returns_everything_in_order() {
        let catalog = sample();
        assert_eq!(filter_entries(&catalog, &FilterState::default()), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn query_matches_title_case_insensitively() {
        let catalog = sample();
        let result = filter_entries(&catalog, &FilterState::new("ozark", ALL_TAG));
        assert_eq!(titles(&catalog, &result), vec!["Ozark (LMS Dashboard)"]);
    }

    #[test]
    fn query_without_match_is_empty() {
        let catalog = sample();
        assert!(filter_entries(&catalog, &FilterState::new("zzz", ALL_TAG)).is_empty());
    }

    #[test]
    fn query_matches_summary_and_tags() {
        let catalog = sample();
        assert_eq!(filter_entries(&catalog, &FilterState::new("PAYROLL ops", ALL_TAG)), Vec::<usize>::new());
        assert_eq!(filter_entries(&catalog, &FilterState::new("payroll op", ALL_TAG)), vec![2]);
        // "javas" only appears as a tag substring
        assert_eq!(filter_entries(&catalog, &FilterState::new("javas", ALL_TAG)), vec![1]);
    }

    #[test]
    fn details_text_is_not_searched() {
        let catalog = sample();
        assert!(filter_entries(&catalog, &FilterState::new("never searched", ALL_TAG)).is_empty());
    }

    #[test]
    fn query_is_trimmed() {
        let catalog = sample();
        assert_eq!(filter_entries(&catalog, &FilterState::new("  ozark  ", ALL_TAG)), vec![0]);
        assert_eq!(filter_entries(&catalog, &FilterState::new("   ", ALL_TAG)).len(), 5);
    }

    #[test]
    fn tag_filter_is_exact_and_preserves_order() {
        let catalog = sample();
        let result = filter_entries(&catalog, &FilterState::new("", "Java"));
        assert_eq!(result, vec![2, 4]);
        // tag match is exact, not substring or case-folded
        assert!(filter_entries(&catalog, &FilterState::new("", "java")).is_empty());
    }

    #[test]
    fn query_and_tag_must_both_match() {
        let catalog = sample();
        assert_eq!(filter_entries(&catalog, &FilterState::new("helper", "Java")), vec![4]);
        assert!(filter_entries(&catalog, &FilterState::new("ozark", "Java")).is_empty());
    }

    #[test]
    fn every_result_contains_the_query() {
        let catalog = sample();
        for q in ["ui", "a", "java", "Dash", "3d"] {
            let needle = q.to_lowercase();
            for i in filter_entries(&catalog, &FilterState::new(q, ALL_TAG)) {
                let e = &catalog.entries()[i];
                assert!(
                    e.title.to_lowercase().contains(&needle)
                        || e.summary.to_lowercase().contains(&needle)
                        || e.tags.iter().any(|t| t.to_lowercase().contains(&needle)),
                    "{} should not match {}",
                    e.title,
                    q
                );
            }
        }
    }

    #[test]
    fn engine_memo_matches_pure_result() {
        let catalog = sample();
        let mut engine = FilterEngine::new();
        let a = FilterState::new("ui", ALL_TAG);
        let b = FilterState::new("", "Java");
        assert_eq!(engine.apply(&catalog, &a), filter_entries(&catalog, &a).as_slice());
        assert_eq!(engine.apply(&catalog, &b), filter_entries(&catalog, &b).as_slice());
        assert_eq!(engine.apply(&catalog, &a), filter_entries(&catalog, &a).as_slice());
    }

    #[test]
    fn filter_state_activity() {
        assert!(!FilterState::default().is_active());
        assert!(!FilterState::new("  ", ALL_TAG).is_active());
        assert!(FilterState::new("x", ALL_TAG).is_active());
        assert!(FilterState::new("", "Java").is_active());
    }
}
