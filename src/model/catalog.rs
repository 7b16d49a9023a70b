use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::entry::{Credential, Entry};

/// The tag value that matches every entry
pub const ALL_TAG: &str = "All";

/// A labelled outbound profile link (GitHub, LinkedIn, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLink {
    pub label: String,
    pub url: String,
}

/// Owner details shown in the hero and contact sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub links: Vec<ProfileLink>,
}

/// Every distinct tag across the catalog, `"All"` first, then first-appearance order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagIndex {
    tags: IndexSet<String>,
}

impl TagIndex {
    pub fn build(entries: &[Entry]) -> Self {
        let mut tags = IndexSet::new();
        tags.insert(ALL_TAG.to_string());
        for entry in entries {
            for tag in &entry.tags {
                tags.insert(tag.clone());
            }
        }
        TagIndex { tags }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|s| s.as_str())
    }

    pub fn position(&self, tag: &str) -> Option<usize> {
        self.tags.get_index_of(tag)
    }

    /// Tag `step` places away from `current`, wrapping around. Unknown tags restart at "All".
    pub fn cycle(&self, current: &str, step: isize) -> &str {
        let len = self.tags.len() as isize;
        let idx = match self.position(current) {
            Some(i) => (i as isize + step).rem_euclid(len),
            None => 0,
        };
        self.tags
            .get_index(idx as usize)
            .map(|s| s.as_str())
            .unwrap_or(ALL_TAG)
    }
}

/// The immutable, ordered catalog for one session
#[derive(Debug, Clone)]
pub struct Catalog {
    profile: Profile,
    entries: Vec<Entry>,
    credentials: Vec<Credential>,
    tags: TagIndex,
}

impl Catalog {
    pub fn new(profile: Profile, entries: Vec<Entry>, credentials: Vec<Credential>) -> Self {
        let tags = TagIndex::build(&entries);
        Catalog {
            profile,
            entries,
            credentials,
            tags,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    /// Find an entry by title, ignoring case
    pub fn find_by_title(&self, title: &str) -> Option<usize> {
        let needle = title.trim().to_lowercase();
        self.entries
            .iter()
            .position(|e| e.title.to_lowercase() == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::EntryLink;

    fn entry(title: &str, tags: &[&str]) -> Entry {
        Entry {
            title: title.into(),
            year: "2025".into(),
            summary: format!("{} summary", title),
            details: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            primary_tag: tags.first().map(|t| t.to_string()).unwrap_or_default(),
            links: vec![EntryLink::detail("Details")],
        }
    }

    #[test]
    fn tag_index_starts_with_all_and_keeps_first_appearance() {
        let entries = vec![
            entry("A", &["React", "UI/UX"]),
            entry("B", &["Java", "React"]),
        ];
        let idx = TagIndex::build(&entries);
        let tags: Vec<&str> = idx.iter().collect();
        assert_eq!(tags, vec!["All", "React", "UI/UX", "Java"]);
    }

    #[test]
    fn tag_index_of_empty_catalog_is_just_all() {
        let idx = TagIndex::build(&[]);
        assert_eq!(idx.len(), 1);
        assert!(idx.contains(ALL_TAG));
    }

    #[test]
    fn tag_cycle_wraps_both_ways() {
        let idx = TagIndex::build(&[entry("A", &["React", "Java"])]);
        assert_eq!(idx.cycle("All", 1), "React");
        assert_eq!(idx.cycle("Java", 1), "All");
        assert_eq!(idx.cycle("All", -1), "Java");
        assert_eq!(idx.cycle("Nope", 1), "All");
    }

    #[test]
    fn find_by_title_is_case_insensitive() {
        let catalog = Catalog::new(
            Profile::default(),
            vec![entry("Ozark (LMS Dashboard)", &["React"]), entry("Cosmic Fusion", &["3D"])],
            vec![],
        );
        assert_eq!(catalog.find_by_title("cosmic fusion"), Some(1));
        assert_eq!(catalog.find_by_title("cosmic"), None);
    }
}
