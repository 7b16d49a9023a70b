use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::catalog_io::{EMBEDDED_CATALOG, parse_catalog};
use crate::model::SiteConfig;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over the built-in catalog, laid out for a TERM_W x TERM_H terminal.
pub fn sample_app(capable: bool) -> App {
    let catalog = parse_catalog(EMBEDDED_CATALOG).unwrap();
    let mut app = App::new(catalog, SiteConfig::default(), capable);
    app.year = 2026;
    app.resize(TERM_W, TERM_H);
    app
}

/// Measure and deliver signals until the page is quiet.
pub fn settle_signals(app: &mut App) {
    while app.measure() > 0 {
        app.drain_signals();
    }
}

/// Render the whole screen for `app`.
pub fn render_app(app: &App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app))
}
