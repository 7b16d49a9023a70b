use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// How a link on an entry card behaves when activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Opens the detail overlay for the owning entry
    Detail,
    /// Points somewhere outside the browser (carries a target)
    External,
}

/// A labelled action attached to an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLink {
    pub label: String,
    pub kind: LinkKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl EntryLink {
    pub fn detail(label: &str) -> Self {
        EntryLink {
            label: label.to_string(),
            kind: LinkKind::Detail,
            target: None,
        }
    }

    pub fn external(label: &str, target: &str) -> Self {
        EntryLink {
            label: label.to_string(),
            kind: LinkKind::External,
            target: Some(target.to_string()),
        }
    }

    pub fn is_detail(&self) -> bool {
        self.kind == LinkKind::Detail
    }
}

/// One filterable catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub year: String,
    /// One-line highlight shown on the card
    pub summary: String,
    /// Long-form text shown in the detail overlay
    pub details: String,
    /// Tags in declaration order (duplicates collapse)
    pub tags: IndexSet<String>,
    pub primary_tag: String,
    #[serde(default)]
    pub links: Vec<EntryLink>,
}

impl Entry {
    /// Stable element identity of this entry's card on the page
    pub fn element_id(&self) -> String {
        format!("entry:{}", slug(&self.title))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// The first link that opens the detail overlay, if any
    pub fn detail_link(&self) -> Option<&EntryLink> {
        self.links.iter().find(|l| l.is_detail())
    }

    /// Links that leave the browser, in declaration order
    pub fn external_links(&self) -> impl Iterator<Item = &EntryLink> {
        self.links.iter().filter(|l| l.kind == LinkKind::External)
    }
}

/// A static credential card (not filterable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Credential {
    pub fn element_id(&self) -> String {
        format!("cert:{}", slug(&self.title))
    }
}

/// Lowercase ASCII-alphanumeric slug with single dashes, used for element ids
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}
