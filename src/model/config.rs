use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Browser configuration (folio.toml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Page landmarks in navigation order
    #[serde(default = "default_landmarks")]
    pub landmarks: Vec<String>,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub sections: SectionConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            landmarks: default_landmarks(),
            reveal: RevealConfig::default(),
            sections: SectionConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// false = run as if the host had no visibility capability
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minimum visible fraction before a block is revealed
    #[serde(default = "default_reveal_threshold")]
    pub threshold: f32,
    /// Delay between a filter change and re-registration, in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            enabled: true,
            threshold: default_reveal_threshold(),
            settle_ms: default_settle_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Visibility thresholds for landmark tracking
    #[serde(default = "default_section_thresholds")]
    pub thresholds: Vec<f32>,
}

impl Default for SectionConfig {
    fn default() -> Self {
        SectionConfig {
            thresholds: default_section_thresholds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
    #[serde(default)]
    pub tag_colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
            tag_colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_landmarks() -> Vec<String> {
    ["home", "projects", "certs", "contact"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_reveal_threshold() -> f32 {
    0.12
}

fn default_settle_ms() -> u64 {
    40
}

fn default_section_thresholds() -> Vec<f32> {
    vec![0.15, 0.25, 0.35, 0.5]
}
