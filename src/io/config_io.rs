use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::SiteConfig;

/// Commented default configuration, printed by `folio config`
pub const DEFAULT_CONFIG: &str = include_str!("../templates/folio.toml");

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("{field} must be within 0.0..=1.0, got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f32 },
}

/// Read the config at `path`, or the embedded template when `None`.
pub fn read_config(path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let Some(path) = path else {
        return parse_config(DEFAULT_CONFIG);
    };
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config(&text)
}

pub fn parse_config(text: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(text)?;
    check_threshold("reveal.threshold", config.reveal.threshold)?;
    for &t in &config.sections.thresholds {
        check_threshold("sections.thresholds", t)?;
    }
    Ok(config)
}

fn check_threshold(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { field, value })
    }
}
