use std::io;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use chrono::Datelike;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use regex::Regex;

use crate::io::clipboard::copy_quietly;
use crate::model::{Catalog, LinkKind, SiteConfig};
use crate::ops::filter::{FilterEngine, FilterState};
use crate::ops::landmarks::SectionActivityTracker;
use crate::ops::overlay::{CloseEffect, CloseTrigger, DetailOverlay};
use crate::ops::reveal::RevealTracker;
use crate::ops::timer::OneShotTimer;
use crate::ops::visibility::SignalBatch;

use super::input;
use super::page::PageLayout;
use super::render;
use super::theme::Theme;
use super::viewport::Viewport;

/// Rows above the page (nav bar + separator)
pub const NAV_ROWS: u16 = 2;
/// Rows below the page (status row)
pub const STATUS_ROWS: u16 = 1;
/// Widest the page content gets
pub const MAX_PAGE_WIDTH: usize = 96;

const IDLE_POLL: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing into the search box; every keystroke re-filters
    Query,
}

/// Main application state
pub struct App {
    pub catalog: Catalog,
    pub config: SiteConfig,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    /// Help overlay visible
    pub show_help: bool,
    pub filter: FilterState,
    engine: FilterEngine,
    /// Entry indices passing the filter, in catalog order
    pub visible: Vec<usize>,
    /// Focused card (index into `visible`)
    pub cursor: usize,
    pub layout: PageLayout,
    pub viewport: Viewport,
    signals: Receiver<SignalBatch>,
    pub reveal: RevealTracker,
    pub landmarks: SectionActivityTracker,
    pub overlay: DetailOverlay,
    /// Pending reveal re-registration after a filter change
    pub settle: OneShotTimer<()>,
    /// One-shot message for the status row
    pub status: Option<String>,
    /// Text waiting to be written to the terminal clipboard
    pub clipboard_outbox: Vec<String>,
    /// Whole terminal area as of the last resize
    pub screen: Rect,
    /// Year shown in the footer
    pub year: i32,
    mounted: bool,
}

impl App {
    /// `capable = false` runs without visibility tracking: every block is
    /// revealed at once and the active section never changes.
    pub fn new(catalog: Catalog, config: SiteConfig, capable: bool) -> Self {
        let theme = Theme::from_config(&config.ui);
        let (viewport, signals) = Viewport::new(capable);
        let filter = FilterState::default();
        let mut engine = FilterEngine::new();
        let visible = engine.apply(&catalog, &filter).to_vec();
        let reveal = RevealTracker::new(config.reveal.threshold);
        let landmarks =
            SectionActivityTracker::new(&config.landmarks, &config.sections.thresholds);

        App {
            catalog,
            theme,
            mode: Mode::Navigate,
            should_quit: false,
            show_help: false,
            filter,
            engine,
            visible,
            cursor: 0,
            layout: PageLayout::default(),
            viewport,
            signals,
            reveal,
            landmarks,
            overlay: DetailOverlay::new(),
            settle: OneShotTimer::new(),
            status: None,
            clipboard_outbox: Vec::new(),
            screen: Rect::default(),
            year: chrono::Local::now().year(),
            config,
            mounted: false,
        }
    }

    /// Area the page scrolls in, for a given terminal area
    pub fn page_area(screen: Rect) -> Rect {
        let height = screen.height.saturating_sub(NAV_ROWS + STATUS_ROWS);
        let width = (screen.width as usize).saturating_sub(2).min(MAX_PAGE_WIDTH) as u16;
        let x = screen.x + (screen.width.saturating_sub(width)) / 2;
        Rect::new(x, screen.y + NAV_ROWS, width, height)
    }

    /// Track a terminal resize. The first call lays the page out and registers
    /// both trackers.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = Rect::new(0, 0, width, height);
        let page = Self::page_area(self.screen);
        self.viewport.set_height(page.height as usize);
        if !self.mounted || self.layout.width != (page.width as usize).max(12) {
            self.relayout_to(page.width as usize);
        }
        if !self.mounted {
            self.mount();
        }
    }

    fn relayout(&mut self) {
        let width = self.layout.width;
        self.relayout_to(width);
    }

    fn relayout_to(&mut self, width: usize) {
        self.layout = PageLayout::build(&self.catalog, &self.visible, &self.filter, width, self.year);
        self.viewport
            .set_layout(self.layout.element_spans(), self.layout.height);
    }

    fn mount(&mut self) {
        self.mounted = true;
        self.register_reveal();
        let found = self.landmarks.register(&mut self.viewport);
        tracing::info!(
            landmarks = found,
            active = self.landmarks.active(),
            "page mounted"
        );
    }

    /// Re-register every rendered revealable block
    pub fn register_reveal(&mut self) {
        let ids = self.layout.revealable_ids();
        let observed = self.reveal.register(&mut self.viewport, &ids);
        tracing::debug!(
            rendered = ids.len(),
            observed,
            revealed = self.reveal.revealed_count(),
            "reveal registered"
        );
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // -- filtering --

    pub fn set_query(&mut self, query: &str, now: Instant) {
        if self.filter.query == query {
            return;
        }
        self.filter.query = query.to_string();
        self.filter_changed(now);
    }

    pub fn set_tag(&mut self, tag: &str, now: Instant) {
        if self.filter.active_tag == tag {
            return;
        }
        self.filter.active_tag = tag.to_string();
        self.filter_changed(now);
    }

    /// Step through the tag index (`step` = 1 next, -1 previous)
    pub fn cycle_tag(&mut self, step: isize, now: Instant) {
        let next = self.catalog.tags().cycle(&self.filter.active_tag, step).to_string();
        self.set_tag(&next, now);
    }

    fn filter_changed(&mut self, now: Instant) {
        self.visible = self.engine.apply(&self.catalog, &self.filter).to_vec();
        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
        self.relayout();
        if !self.mounted {
            return;
        }
        let delay = Duration::from_millis(self.config.reveal.settle_ms);
        if delay.is_zero() {
            self.settle.cancel();
            self.register_reveal();
        } else if self.settle.schedule(now, delay, ()) {
            tracing::trace!("superseded pending reveal registration");
        }
    }

    /// Case-insensitive matcher for the current query, used to highlight
    /// matches on the cards
    pub fn query_regex(&self) -> Option<Regex> {
        let query = self.filter.query.trim();
        if query.is_empty() {
            return None;
        }
        Regex::new(&format!("(?i){}", regex::escape(query))).ok()
    }

    // -- event loop plumbing --

    /// Fire the settle timer if due
    pub fn tick(&mut self, now: Instant) {
        if self.settle.poll(now).is_some() {
            self.register_reveal();
        }
    }

    /// How long the loop may block waiting for input
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.settle
            .remaining(now)
            .map_or(IDLE_POLL, |left| left.min(IDLE_POLL))
    }

    /// Compare the viewport with every observed element and queue signals
    pub fn measure(&mut self) -> usize {
        self.viewport.measure()
    }

    /// Deliver queued signal batches to their trackers, one at a time
    pub fn drain_signals(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(batch) = self.signals.try_recv() {
            self.dispatch(&batch);
            delivered += 1;
        }
        delivered
    }

    fn dispatch(&mut self, batch: &SignalBatch) {
        let sub = Some(batch.subscription);
        if sub == self.reveal.subscription() {
            let shown = self.reveal.handle_batch(&mut self.viewport, batch);
            if !shown.is_empty() {
                tracing::debug!(count = shown.len(), "revealed");
            }
        } else if sub == self.landmarks.subscription() {
            if let Some(active) = self.landmarks.handle_batch(batch) {
                tracing::debug!(landmark = active, "active section");
            }
        } else {
            tracing::trace!(subscription = %batch.subscription, "stale batch dropped");
        }
    }

    // -- navigation --

    pub fn focused_entry(&self) -> Option<usize> {
        self.visible.get(self.cursor).copied()
    }

    /// Move card focus and scroll the focused card into view
    pub fn move_cursor(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self.scroll_focus_into_view();
    }

    pub fn focus_entry(&mut self, entry: usize) -> bool {
        match self.visible.iter().position(|&i| i == entry) {
            Some(pos) => {
                self.cursor = pos;
                true
            }
            None => false,
        }
    }

    fn scroll_focus_into_view(&mut self) {
        if let Some(id) = self
            .focused_entry()
            .and_then(|i| self.catalog.entry(i))
            .map(|e| e.element_id())
        {
            self.viewport.ensure_visible(&id);
        }
    }

    /// Scroll a landmark section to the top of the page area
    pub fn jump_to_landmark(&mut self, landmark: &str) -> bool {
        if self.viewport.scroll_to(landmark) {
            true
        } else {
            self.status = Some(format!("No section \"{}\" on this page", landmark));
            false
        }
    }

    /// Jump to the n-th configured landmark (0-based)
    pub fn jump_to_nth_landmark(&mut self, n: usize) -> bool {
        match self.landmarks.landmarks().get(n).cloned() {
            Some(id) => self.jump_to_landmark(&id),
            None => false,
        }
    }

    /// Follow the focused entry's first link
    pub fn activate_focused(&mut self) {
        if let Some(entry) = self.focused_entry() {
            self.activate_entry(entry);
        }
    }

    /// Follow an entry's first link: detail links open the overlay, external
    /// links are copied to the clipboard.
    pub fn activate_entry(&mut self, entry: usize) {
        let Some(link) = self.catalog.entry(entry).and_then(|e| e.links.first()).cloned() else {
            return;
        };
        match link.kind {
            LinkKind::Detail => {
                if self.overlay.open_from_link(entry, &link) {
                    tracing::debug!(entry, "detail overlay opened");
                }
            }
            LinkKind::External => {
                if let Some(url) = link.target {
                    self.status = Some(format!("Copied {}", url));
                    self.clipboard_outbox.push(url);
                }
            }
        }
    }

    /// Close the overlay and apply its effect
    pub fn close_overlay(&mut self, trigger: CloseTrigger) {
        if let Some(CloseEffect::ScrollTo(landmark)) = self.overlay.close(trigger) {
            self.jump_to_landmark(&landmark);
        }
    }

    /// First external link of the entry shown in the overlay
    pub fn copy_overlay_link(&mut self) {
        let url = self
            .overlay
            .selected()
            .and_then(|i| self.catalog.entry(i))
            .and_then(|e| e.external_links().next())
            .and_then(|l| l.target.clone());
        match url {
            Some(url) => {
                self.status = Some(format!("Copied {}", url));
                self.clipboard_outbox.push(url);
            }
            None => self.status = Some("No external link for this entry".into()),
        }
    }

    pub fn copy_email(&mut self) {
        let email = self.catalog.profile().email.clone();
        if email.is_empty() {
            self.status = Some("No email address configured".into());
            return;
        }
        self.status = Some(format!("Copied {}", email));
        self.clipboard_outbox.push(email);
    }
}

/// Run the TUI application
pub fn run(catalog: Catalog, config: SiteConfig, capable: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(catalog, config, capable);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let size = terminal.size()?;
        app.resize(size.width, size.height);
        terminal.draw(|frame| render::render(frame, app))?;
        app.measure();

        for text in app.clipboard_outbox.drain(..) {
            copy_quietly(&mut io::stdout(), &text);
        }

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key, Instant::now());
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        app.tick(Instant::now());
        app.drain_signals();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
