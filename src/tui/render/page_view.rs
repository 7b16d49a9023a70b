use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regex::Regex;

use crate::tui::app::App;
use crate::tui::page::{BlockKind, Role, Row};
use crate::util::unicode::display_width;

/// Render the window of page rows the viewport currently shows.
///
/// Blocks still pending reveal keep their frame and height but draw only
/// their border, in the placeholder color.
pub fn render_page(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let scroll = app.viewport.scroll();
    let height = area.height as usize;
    let focused = app.focused_entry();
    let query_re = app.query_regex();

    let mut lines: Vec<Line> = vec![Line::default(); height];
    for block in &app.layout.blocks {
        if block.bottom() <= scroll || block.top >= scroll + height {
            continue;
        }
        let pending = block.revealable && !app.reveal.is_revealed(&block.id);
        let is_focused = matches!(block.kind, BlockKind::Entry(i) if Some(i) == focused);
        // Only cards carry query matches
        let re = match block.kind {
            BlockKind::Entry(_) => query_re.as_ref(),
            _ => None,
        };
        for (offset, row) in block.rows.iter().enumerate() {
            let page_row = block.top + offset;
            if page_row < scroll || page_row >= scroll + height {
                continue;
            }
            lines[page_row - scroll] = if pending {
                placeholder_line(app, row)
            } else {
                styled_line(app, row, is_focused, re)
            };
        }
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn styled_line<'a>(app: &App, row: &'a Row, focused: bool, re: Option<&Regex>) -> Line<'a> {
    let mut spans: Vec<Span> = Vec::with_capacity(row.len());
    for seg in row {
        let mut style = app.theme.role_style(seg.role, &seg.text);
        if focused && seg.role == Role::Border {
            style = style
                .fg(app.theme.selection_border)
                .add_modifier(Modifier::BOLD);
        }
        match (seg.role, re) {
            (Role::Title | Role::Text | Role::Tag, Some(re)) => {
                push_highlighted_spans(&mut spans, &seg.text, style, app.theme.search_match_style(), re)
            }
            _ => spans.push(Span::styled(seg.text.as_str(), style)),
        }
    }
    Line::from(spans)
}

/// Split `text` into spans, styling every query match with `hit`
fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &'a str,
    base: Style,
    hit: Style,
    re: &Regex,
) {
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            spans.push(Span::styled(&text[last..m.start()], base));
        }
        spans.push(Span::styled(m.as_str(), hit));
        last = m.end();
    }
    if last < text.len() || text.is_empty() {
        spans.push(Span::styled(&text[last..], base));
    }
}

fn placeholder_line<'a>(app: &App, row: &'a Row) -> Line<'a> {
    let style = app.theme.placeholder_style();
    let spans: Vec<Span> = row
        .iter()
        .map(|seg| {
            if seg.role == Role::Border {
                Span::styled(seg.text.as_str(), style)
            } else {
                Span::styled(" ".repeat(display_width(&seg.text)), style)
            }
        })
        .collect();
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::page::row_text;
    use crate::tui::render::test_helpers::*;

    fn page_text(app: &App) -> String {
        let area = App::page_area(app.screen);
        render_to_string(TERM_W, TERM_H, |frame, _| render_page(frame, app, area))
    }

    #[test]
    fn pending_blocks_render_as_placeholders() {
        let app = sample_app(true);
        let output = page_text(&app);
        // Frame drawn, content withheld
        assert!(output.contains("\u{256D}"));
        assert!(!output.contains("Full Stack Developer focused"));
    }

    #[test]
    fn revealed_blocks_show_content() {
        let mut app = sample_app(true);
        settle_signals(&mut app);
        let output = page_text(&app);
        assert!(output.contains("Ifrad Hossain"));
        assert!(output.contains("Full Stack Developer focused"));
    }

    #[test]
    fn without_capability_content_shows_at_once() {
        let app = sample_app(false);
        let output = page_text(&app);
        assert!(output.contains("Full Stack Developer focused"));
    }

    #[test]
    fn window_follows_scroll() {
        let mut app = sample_app(false);
        app.viewport.scroll_to("entry:cosmic-fusion");
        let output = page_text(&app);
        let first = output.lines().nth(2).unwrap();
        assert!(first.contains("Cosmic Fusion"), "{first}");
        assert!(output.contains("Interactive 3D Solar System"));
    }

    #[test]
    fn query_matches_are_highlighted_on_cards() {
        let mut app = sample_app(false);
        app.set_query("GALAXY", std::time::Instant::now());
        let row = app
            .layout
            .blocks
            .iter()
            .find(|b| b.id == "entry:cosmic-fusion")
            .and_then(|b| b.rows.iter().find(|r| row_text(r).contains("Galaxy")))
            .cloned()
            .unwrap();
        let re = app.query_regex().unwrap();
        let line = styled_line(&app, &row, false, Some(&re));
        let hits: Vec<&str> = line
            .spans
            .iter()
            .filter(|s| s.style.bg == Some(app.theme.search_match_bg))
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(hits, vec!["Galaxy"]);
    }

    #[test]
    fn highlight_splits_around_each_match() {
        let theme = crate::tui::theme::Theme::default();
        let re = Regex::new("(?i)ab").unwrap();
        let mut spans = Vec::new();
        push_highlighted_spans(
            &mut spans,
            "xAByab",
            Style::default(),
            theme.search_match_style(),
            &re,
        );
        let parts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["x", "AB", "y", "ab"]);
    }

    #[test]
    fn focused_card_is_the_one_under_the_cursor() {
        let mut app = sample_app(false);
        app.move_cursor(2);
        assert_eq!(app.focused_entry(), Some(2));
        let output = page_text(&app);
        assert!(output.contains("HR Management & Payroll System"));
    }
}
