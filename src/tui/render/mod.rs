pub mod help_overlay;
pub mod nav_bar;
pub mod overlay;
pub mod page_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, NAV_ROWS, STATUS_ROWS};

/// Main render function: dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: nav bar (2 rows) | page | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(NAV_ROWS),
            Constraint::Min(1),
            Constraint::Length(STATUS_ROWS),
        ])
        .split(area);

    nav_bar::render_nav_bar(frame, app, chunks[0]);
    page_view::render_page(frame, app, App::page_area(area));

    if app.overlay.is_open() {
        overlay::render_detail_overlay(frame, app, area);
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}
