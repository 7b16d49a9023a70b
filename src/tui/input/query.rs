use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::util::unicode::{pop_grapheme, pop_word};

/// Search box input. Every edit re-filters immediately; Enter keeps the
/// query, Esc clears it.
pub(super) fn handle_query(app: &mut App, key: KeyEvent, now: Instant) {
    let mut query = app.filter.query.clone();
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.mode = Mode::Navigate;
            query.clear();
        }
        (_, KeyCode::Enter) => {
            app.mode = Mode::Navigate;
            return;
        }
        (KeyModifiers::CONTROL, KeyCode::Char('w')) | (KeyModifiers::ALT, KeyCode::Backspace) => {
            pop_word(&mut query);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => query.clear(),
        (_, KeyCode::Backspace) => pop_grapheme(&mut query),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => query.push(c),
        _ => return,
    }
    app.set_query(&query, now);
}
