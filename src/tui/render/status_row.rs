use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::display_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Query => (
            vec![
                Span::styled(
                    format!("/{}", app.filter.query),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
            ],
            "Enter keep  Esc clear",
        ),
        Mode::Navigate => {
            let left = match &app.status {
                Some(message) => vec![Span::styled(
                    message.clone(),
                    Style::default().fg(app.theme.green).bg(bg),
                )],
                None => vec![Span::styled(
                    format!(
                        "{} of {} projects",
                        app.visible.len(),
                        app.catalog.entries().len()
                    ),
                    Style::default().fg(app.theme.dim).bg(bg),
                )],
            };
            let hint = if app.overlay.is_open() || !app.config.ui.show_key_hints {
                ""
            } else {
                "/ search  t tag  j/k move  Enter open  ? help"
            };
            (left, hint)
        }
    };

    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::tui::render::test_helpers::*;

    fn status_text(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn navigate_shows_count_and_hints() {
        let app = sample_app(true);
        let text = status_text(&app);
        assert!(text.starts_with("6 of 6 projects"), "{text}");
        assert!(text.ends_with("? help"), "{text}");
    }

    #[test]
    fn query_mode_shows_prompt() {
        let mut app = sample_app(true);
        app.mode = Mode::Query;
        app.set_query("react", Instant::now());
        let text = status_text(&app);
        assert!(text.starts_with("/react\u{258C}"), "{text}");
        assert!(text.ends_with("Enter keep  Esc clear"));
    }

    #[test]
    fn status_message_replaces_count() {
        let mut app = sample_app(true);
        app.copy_email();
        let text = status_text(&app);
        assert!(text.starts_with("Copied ifrad.hossain04@gmail.com"), "{text}");
    }

    #[test]
    fn hints_can_be_turned_off() {
        let mut app = sample_app(true);
        app.config.ui.show_key_hints = false;
        assert_eq!(status_text(&app), "6 of 6 projects");
    }
}
