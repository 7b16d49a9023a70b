use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::tui::page::PROJECTS;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent, now: Instant) {
    let page = app.viewport.height().max(1) as isize;

    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) => app.should_quit = true,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => app.should_quit = true,
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Card focus
        (_, KeyCode::Char('j') | KeyCode::Down) => app.move_cursor(1),
        (_, KeyCode::Char('k') | KeyCode::Up) => app.move_cursor(-1),
        (_, KeyCode::Enter | KeyCode::Char('o')) => app.activate_focused(),

        // Page scrolling
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => {
            app.viewport.scroll_by(page / 2);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            app.viewport.scroll_by(-page / 2);
        }
        (_, KeyCode::PageDown | KeyCode::Char(' ')) => {
            app.viewport.scroll_by(page);
        }
        (_, KeyCode::PageUp) => {
            app.viewport.scroll_by(-page);
        }
        (_, KeyCode::Char('g') | KeyCode::Home) => {
            app.viewport.scroll_to_row(0);
        }
        (_, KeyCode::Char('G') | KeyCode::End) => {
            app.viewport.scroll_to_row(usize::MAX);
        }

        // Sections
        (_, KeyCode::Char(c @ '1'..='9')) => {
            let n = c as usize - '1' as usize;
            app.jump_to_nth_landmark(n);
        }
        (_, KeyCode::Char('p')) => {
            app.jump_to_landmark(PROJECTS);
        }

        // Filtering
        (_, KeyCode::Char('/')) => app.mode = Mode::Query,
        (_, KeyCode::Char('t')) => app.cycle_tag(1, now),
        (_, KeyCode::Char('T')) => app.cycle_tag(-1, now),
        (_, KeyCode::Char('x')) => {
            app.set_query("", now);
            app.set_tag(crate::model::ALL_TAG, now);
        }

        (_, KeyCode::Char('c')) => app.copy_email(),
        _ => {}
    }
}
