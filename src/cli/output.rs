use serde::Serialize;

use crate::model::{Catalog, Entry, EntryLink, LinkKind, TagIndex};
use crate::ops::filter::FilterState;
use crate::util::unicode::{display_width, pad_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EntryJson {
    pub id: String,
    pub title: String,
    pub year: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub primary_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkJson>,
}

#[derive(Serialize)]
pub struct LinkJson {
    pub label: String,
    pub kind: LinkKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Serialize)]
pub struct EntryListJson {
    pub query: String,
    pub tag: String,
    pub total: usize,
    pub entries: Vec<EntryJson>,
}

impl From<&EntryLink> for LinkJson {
    fn from(link: &EntryLink) -> Self {
        LinkJson {
            label: link.label.clone(),
            kind: link.kind,
            target: link.target.clone(),
        }
    }
}

/// JSON form of an entry. `full` includes the details text.
pub fn entry_to_json(entry: &Entry, full: bool) -> EntryJson {
    EntryJson {
        id: entry.element_id(),
        title: entry.title.clone(),
        year: entry.year.clone(),
        summary: entry.summary.clone(),
        tags: entry.tags.iter().cloned().collect(),
        primary_tag: entry.primary_tag.clone(),
        details: full.then(|| entry.details.clone()),
        links: entry.links.iter().map(LinkJson::from).collect(),
    }
}

pub fn entry_list_json(catalog: &Catalog, state: &FilterState, indices: &[usize]) -> EntryListJson {
    EntryListJson {
        query: state.query.clone(),
        tag: state.active_tag.clone(),
        total: catalog.entries().len(),
        entries: indices
            .iter()
            .filter_map(|&i| catalog.entry(i))
            .map(|e| entry_to_json(e, false))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One line per entry: title (padded to the longest), year, tags.
pub fn format_entry_list(catalog: &Catalog, indices: &[usize]) -> String {
    let entries: Vec<&Entry> = indices.iter().filter_map(|&i| catalog.entry(i)).collect();
    if entries.is_empty() {
        return "no matching entries".to_string();
    }
    let title_w = entries
        .iter()
        .map(|e| display_width(&e.title))
        .max()
        .unwrap_or(0);
    entries
        .iter()
        .map(|e| {
            let tags: Vec<&str> = e.tags.iter().map(String::as_str).collect();
            format!(
                "{}  {}  {}",
                pad_to_width(&e.title, title_w),
                e.year,
                tags.join(", ")
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_tags(tags: &TagIndex) -> String {
    tags.iter().collect::<Vec<_>>().join("\n")
}

pub fn format_entry(entry: &Entry) -> String {
    let tags: Vec<&str> = entry.tags.iter().map(String::as_str).collect();
    let mut out = vec![
        entry.title.clone(),
        format!("year: {}", entry.year),
        format!("tags: {}", tags.join(", ")),
        format!("primary: {}", entry.primary_tag),
        String::new(),
        entry.summary.clone(),
    ];
    if !entry.details.is_empty() {
        out.push(String::new());
        out.push(entry.details.clone());
    }
    let links: Vec<String> = entry
        .links
        .iter()
        .map(|l| match (&l.kind, &l.target) {
            (LinkKind::External, Some(url)) => format!("link: {} <{}>", l.label, url),
            _ => format!("link: {}", l.label),
        })
        .collect();
    if !links.is_empty() {
        out.push(String::new());
        out.extend(links);
    }
    out.join("\n")
}
