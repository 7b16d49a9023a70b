use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Browse",
        &[
            ("\u{2191}\u{2193}/jk", "Move between projects"),
            ("Enter/o", "Open details or copy link"),
            ("Space/PgDn", "Page down"),
            ("PgUp", "Page up"),
            ("^d/^u", "Half page down/up"),
            ("g/G", "Top / bottom"),
            ("1-9", "Jump to section"),
            ("p", "Jump to projects"),
        ],
    ),
    (
        "Filter",
        &[
            ("/", "Search title, summary, tags"),
            ("t/T", "Next / previous tag"),
            ("x", "Clear filter"),
        ],
    ),
    (
        "Details",
        &[
            ("Esc/q", "Close"),
            ("b", "Close and return to projects"),
            ("y", "Copy external link"),
            ("click outside", "Close"),
        ],
    ),
    (
        "Other",
        &[("c", "Copy email"), ("?", "Toggle help"), ("q", "Quit")],
    ),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
    ];
    for (i, (section, bindings)) in BINDINGS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(format!(" {}", section), header_style)));
        for (key, desc) in bindings.iter() {
            add_binding(&mut lines, key, desc, key_style, desc_style);
        }
    }

    let block = Block::default()
        .title(Span::styled(" Help ", header_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("  {:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn lists_bindings() {
        let app = sample_app(false);
        let output = render_to_string(TERM_W, 40, |frame, area| {
            render_help_overlay(frame, &app, area);
        });
        assert!(output.contains(" Help "));
        assert!(output.contains("Search title, summary, tags"));
        assert!(output.contains("Close and return to projects"));
    }

    #[test]
    fn full_screen_shows_help_on_top() {
        let mut app = sample_app(false);
        app.show_help = true;
        let output = render_app(&app);
        assert!(output.contains("Key Bindings"));
    }
}
