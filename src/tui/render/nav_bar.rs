use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the nav bar: owner name, landmark links with the active one
/// highlighted, and a separator line carrying the filter indicator.
pub fn render_nav_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    render_links(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1]);
}

/// Display label for a landmark id
pub fn landmark_label(id: &str) -> String {
    match id {
        "home" => "Home".into(),
        "projects" => "Projects".into(),
        "certs" => "Certs".into(),
        "contact" => "Contact".into(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn render_links(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut links: Vec<Span> = Vec::new();
    let active = app.landmarks.active();
    for (i, id) in app.landmarks.landmarks().iter().enumerate() {
        let label = format!(" {} {} ", i + 1, landmark_label(id));
        let style = if id == active {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        links.push(Span::styled(label, style));
    }
    let links_width: usize = links.iter().map(|s| display_width(&s.content)).sum();

    let name = &app.catalog.profile().name;
    let brand_room = width.saturating_sub(links_width + 4);
    let mut spans = vec![
        Span::styled(" \u{25C6} ", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            truncate_to_width(name, brand_room),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    if used + links_width <= width {
        spans.push(Span::styled(
            " ".repeat(width - used - links_width),
            Style::default().bg(bg),
        ));
        spans.extend(links);
    }

    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let dim = app.theme.dim;

    if !app.filter.is_active() {
        let sep = Paragraph::new("\u{2500}".repeat(width)).style(Style::default().fg(dim).bg(bg));
        frame.render_widget(sep, area);
        return;
    }

    let mut indicator: Vec<Span> = vec![Span::styled(
        "filter: ",
        Style::default().fg(app.theme.highlight).bg(bg),
    )];
    let query = app.filter.query.trim();
    if !query.is_empty() {
        indicator.push(Span::styled(
            format!("\"{}\"", query),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
    }
    if app.filter.active_tag != crate::model::ALL_TAG {
        if !query.is_empty() {
            indicator.push(Span::styled(" ", Style::default().bg(bg)));
        }
        indicator.push(Span::styled(
            format!("#{}", app.filter.active_tag),
            Style::default()
                .fg(app.theme.tag_color(&app.filter.active_tag))
                .bg(bg),
        ));
    }

    let indicator_width: usize = indicator.iter().map(|s| display_width(&s.content)).sum();
    // one space before the indicator, one at the right edge
    let sep_end = width.saturating_sub(indicator_width + 2);
    let mut spans = vec![
        Span::styled("\u{2500}".repeat(sep_end), Style::default().fg(dim).bg(bg)),
        Span::styled(" ", Style::default().bg(bg)),
    ];
    spans.extend(indicator);
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn shows_owner_and_numbered_landmarks() {
        let app = sample_app(true);
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_nav_bar(frame, &app, area);
        });
        let first = output.lines().next().unwrap();
        assert!(first.starts_with(" \u{25C6} Ifrad Hossain"), "{first}");
        assert!(first.ends_with("1 Home  2 Projects  3 Certs  4 Contact"), "{first}");
        assert_eq!(output.lines().nth(1).unwrap(), "\u{2500}".repeat(TERM_W as usize));
    }

    #[test]
    fn separator_shows_active_filter() {
        let mut app = sample_app(true);
        app.set_query("java", Instant::now());
        app.set_tag("Java", Instant::now());
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_nav_bar(frame, &app, area);
        });
        let sep = output.lines().nth(1).unwrap();
        assert!(sep.ends_with(" filter: \"java\" #Java"), "{sep}");
    }

    #[test]
    fn unknown_landmarks_get_title_case_labels() {
        assert_eq!(landmark_label("about"), "About");
        assert_eq!(landmark_label("certs"), "Certs");
        assert_eq!(landmark_label(""), "");
    }
}
