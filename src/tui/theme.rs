use std::collections::HashMap;

use ratatui::style::{Color, Modifier, Style};

use crate::model::UiConfig;

use super::page::Role;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub cyan: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    /// Foreground of blocks that have not been revealed yet
    pub placeholder: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Per-tag colors
    pub tag_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut tag_colors = HashMap::new();
        tag_colors.insert("React".into(), Color::Rgb(0x44, 0xDD, 0xFF));
        tag_colors.insert("Java".into(), Color::Rgb(0xFF, 0x88, 0x44));
        tag_colors.insert("Python".into(), Color::Rgb(0xFF, 0xD7, 0x00));

        Theme {
            background: Color::Rgb(0x0B, 0x0B, 0x10),
            text: Color::Rgb(0xC8, 0xC8, 0xD2),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x8A, 0xB4, 0xFF),
            dim: Color::Rgb(0x78, 0x78, 0x8C),
            red: Color::Rgb(0xFF, 0x55, 0x55),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            blue: Color::Rgb(0x44, 0x88, 0xFF),
            selection_bg: Color::Rgb(0x1A, 0x1F, 0x33),
            selection_border: Color::Rgb(0x8A, 0xB4, 0xFF),
            placeholder: Color::Rgb(0x2A, 0x2A, 0x36),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0B, 0x0B, 0x10),
            tag_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring unparsable color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                "selection_border" => theme.selection_border = color,
                "placeholder" => theme.placeholder = color,
                "search_match_bg" => theme.search_match_bg = color,
                "search_match_fg" => theme.search_match_fg = color,
                _ => tracing::warn!(key = %key, "unknown color key"),
            }
        }

        for (tag, value) in &ui.tag_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.tag_colors.insert(tag.clone(), color);
            }
        }

        theme
    }

    /// Get the color for a tag, falling back to the dim color
    pub fn tag_color(&self, tag: &str) -> Color {
        self.tag_colors.get(tag).copied().unwrap_or(self.dim)
    }

    /// Style for a segment role. Tag badges look up their tag color from `text`.
    pub fn role_style(&self, role: Role, text: &str) -> Style {
        let base = Style::default().bg(self.background);
        match role {
            Role::Border => base.fg(self.dim),
            Role::Title => base.fg(self.text_bright).add_modifier(Modifier::BOLD),
            Role::Text => base.fg(self.text),
            Role::Dim => base.fg(self.dim),
            Role::Accent => base.fg(self.highlight),
            Role::Tag => {
                let tag = text.trim_start_matches('[').trim_end_matches(']');
                base.fg(self.tag_color(tag))
            }
            Role::Year { blue } => base
                .fg(if blue { self.blue } else { self.red })
                .add_modifier(Modifier::BOLD),
            Role::Link => base.fg(self.cyan).add_modifier(Modifier::UNDERLINED),
            Role::Key => base.fg(self.background).bg(self.highlight),
        }
    }

    pub fn search_match_style(&self) -> Style {
        Style::default()
            .fg(self.search_match_fg)
            .bg(self.search_match_bg)
    }

    /// Style for a block still waiting to be revealed
    pub fn placeholder_style(&self) -> Style {
        Style::default().fg(self.placeholder).bg(self.background)
    }
}
