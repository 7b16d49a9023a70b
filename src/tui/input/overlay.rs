use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::overlay::CloseTrigger;
use crate::tui::app::App;

/// Keys while the detail overlay is open. Anything unbound is swallowed.
pub(super) fn handle_overlay(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc | KeyCode::Char('q')) => app.close_overlay(CloseTrigger::Explicit),
        (_, KeyCode::Char('b')) => app.close_overlay(CloseTrigger::ReturnToCatalog),
        (_, KeyCode::Char('y')) => app.copy_overlay_link(),
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => app.should_quit = true,
        _ => {}
    }
}
