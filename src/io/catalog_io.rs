use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::catalog::{Catalog, Profile};
use crate::model::entry::{Credential, Entry, LinkKind};

/// The catalog shipped inside the binary
pub const EMBEDDED_CATALOG: &str = include_str!("../templates/catalog.toml");

/// Error type for catalog loading
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse catalog: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("entry {index} has an empty title")]
    EmptyTitle { index: usize },
    #[error("entries \"{first}\" and \"{second}\" map to the same element id")]
    DuplicateEntry { first: String, second: String },
    #[error("link \"{label}\" on \"{entry}\": {problem}")]
    InvalidLink {
        entry: String,
        label: String,
        problem: &'static str,
    },
}

/// On-disk shape of a catalog file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    profile: Profile,
    #[serde(default)]
    entries: Vec<Entry>,
    #[serde(default)]
    credentials: Vec<Credential>,
}

/// Parse and validate catalog TOML.
pub fn parse_catalog(text: &str) -> Result<Catalog, CatalogError> {
    let file: CatalogFile = toml::from_str(text)?;
    validate_entries(&file.entries)?;
    check_unique_ids(file.credentials.iter().map(|c| (c.element_id(), &c.title)))?;
    Ok(Catalog::new(file.profile, file.entries, file.credentials))
}

/// Load the catalog from `path`, or the embedded one when `None`.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    let catalog = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| CatalogError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
            parse_catalog(&text)?
        }
        None => parse_catalog(EMBEDDED_CATALOG)?,
    };
    tracing::info!(
        entries = catalog.entries().len(),
        tags = catalog.tags().len(),
        source = %path.map_or_else(|| "embedded".to_string(), |p| p.display().to_string()),
        "catalog loaded"
    );
    Ok(catalog)
}

fn validate_entries(entries: &[Entry]) -> Result<(), CatalogError> {
    if let Some(index) = entries.iter().position(|e| e.title.trim().is_empty()) {
        return Err(CatalogError::EmptyTitle { index });
    }
    check_unique_ids(entries.iter().map(|e| (e.element_id(), &e.title)))?;
    for entry in entries {
        for link in &entry.links {
            let problem = match (link.kind, &link.target) {
                (LinkKind::Detail, Some(_)) => Some("detail links cannot carry a target"),
                (LinkKind::External, None) => Some("external links need a target"),
                _ => None,
            };
            if let Some(problem) = problem {
                return Err(CatalogError::InvalidLink {
                    entry: entry.title.clone(),
                    label: link.label.clone(),
                    problem,
                });
            }
        }
    }
    Ok(())
}

/// Two cards sharing an element id would share reveal state and scroll span
fn check_unique_ids<'a>(
    items: impl Iterator<Item = (String, &'a String)>,
) -> Result<(), CatalogError> {
    let mut seen: HashMap<String, &String> = HashMap::new();
    for (id, title) in items {
        if let Some(first) = seen.insert(id, title) {
            return Err(CatalogError::DuplicateEntry {
                first: first.clone(),
                second: title.clone(),
            });
        }
    }
    Ok(())
}
