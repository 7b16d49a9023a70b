use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::LinkKind;
use crate::tui::app::App;
use crate::tui::wrap::wrap_text;

const MAX_WIDTH: u16 = 72;
const MAX_HEIGHT: u16 = 20;

/// Where the detail overlay sits for a given screen. Clicks outside this
/// rectangle close it.
pub fn overlay_rect(screen: Rect) -> Rect {
    let width = screen.width.saturating_sub(4).min(MAX_WIDTH);
    let height = screen.height.saturating_sub(4).min(MAX_HEIGHT);
    Rect::new(
        screen.x + (screen.width - width) / 2,
        screen.y + (screen.height - height) / 2,
        width,
        height,
    )
}

/// Render the detail overlay for the selected entry
pub fn render_detail_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let Some(entry) = app.overlay.selected().and_then(|i| app.catalog.entry(i)) else {
        return;
    };
    let bg = app.theme.background;
    let popup = overlay_rect(area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", entry.title),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.selection_border).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let wrap_width = inner.width.saturating_sub(2) as usize;
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    let mut badges = vec![Span::styled(
        format!(" {}", entry.year),
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    for tag in &entry.tags {
        badges.push(Span::styled(
            format!(" #{}", tag),
            Style::default().fg(app.theme.tag_color(tag)).bg(bg),
        ));
    }
    lines.push(Line::from(badges));
    lines.push(Line::from(""));

    for row in wrap_text(&entry.details, wrap_width) {
        lines.push(Line::from(Span::styled(format!(" {}", row), text_style)));
    }

    let external: Vec<_> = entry
        .links
        .iter()
        .filter(|l| l.kind == LinkKind::External)
        .collect();
    if !external.is_empty() {
        lines.push(Line::from(""));
        for link in external {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" \u{2197} {} ", link.label),
                    Style::default().fg(app.theme.cyan).bg(bg),
                ),
                Span::styled(link.target.clone().unwrap_or_default(), dim_style),
            ]));
        }
    }

    // Key hints pinned to the last inner row
    let body_rows = inner.height.saturating_sub(1) as usize;
    lines.truncate(body_rows);
    while lines.len() < body_rows {
        lines.push(Line::from(""));
    }
    let mut hints = vec![
        Span::styled(" Esc", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(" close  ", dim_style),
        Span::styled("b", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(" back to projects", dim_style),
    ];
    if entry.external_links().next().is_some() {
        hints.push(Span::styled("  y", Style::default().fg(app.theme.highlight).bg(bg)));
        hints.push(Span::styled(" copy link", dim_style));
    }
    lines.push(Line::from(hints));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}
