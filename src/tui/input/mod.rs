mod navigate;
mod overlay;
mod query;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::ops::overlay::CloseTrigger;

use super::app::{App, Mode};
use super::page::BlockKind;
use super::render::overlay::overlay_rect;

use navigate::handle_navigate;
use overlay::handle_overlay;
use query::handle_query;

/// Rows scrolled per mouse wheel notch
const WHEEL_ROWS: isize = 3;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status = None;
    let key = normalize_key(key);

    // Help overlay intercepts everything
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    if app.overlay.is_open() {
        handle_overlay(app, key);
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key, now),
        Mode::Query => handle_query(app, key, now),
    }
}

/// Handle a mouse event: wheel scrolls, a click outside the detail overlay
/// closes it, a click on a card follows its first link.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown if !app.overlay.is_open() => {
            app.viewport.scroll_by(WHEEL_ROWS);
        }
        MouseEventKind::ScrollUp if !app.overlay.is_open() => {
            app.viewport.scroll_by(-WHEEL_ROWS);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if app.overlay.is_open() {
                let rect = overlay_rect(app.screen);
                let inside = mouse.column >= rect.x
                    && mouse.column < rect.x + rect.width
                    && mouse.row >= rect.y
                    && mouse.row < rect.y + rect.height;
                if !inside {
                    app.close_overlay(CloseTrigger::Outside);
                }
                return;
            }
            click_page(app, mouse.column, mouse.row);
        }
        _ => {}
    }
}

fn click_page(app: &mut App, column: u16, row: u16) {
    let page = App::page_area(app.screen);
    if row < page.y || row >= page.y + page.height || column < page.x || column >= page.x + page.width
    {
        return;
    }
    let page_row = app.viewport.scroll() + (row - page.y) as usize;
    let Some(BlockKind::Entry(entry)) = app.layout.block_at(page_row).map(|b| b.kind.clone()) else {
        return;
    };
    if app.focus_entry(entry) {
        app.activate_entry(entry);
    }
}

/// Shifted letters arrive as uppercase chars on most terminals but not all;
/// fold the SHIFT modifier into the char so handlers only match on the char.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}
