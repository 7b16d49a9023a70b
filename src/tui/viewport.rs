//! The terminal's visibility host.
//!
//! The page is a tall document; the viewport is the window of rows currently
//! on screen. After every draw or scroll the event loop calls
//! [`Viewport::measure`], which compares each observed element's row span with
//! the window and queues [`SignalBatch`]es on a channel. The loop drains that
//! channel on a later iteration, one batch at a time.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::ops::visibility::{SignalBatch, SubscriptionId, SubscriptionTable, VisibilityHost};

pub struct Viewport {
    capable: bool,
    scroll: usize,
    height: usize,
    page_height: usize,
    /// element id -> (top row, height)
    spans: HashMap<String, (usize, usize)>,
    table: SubscriptionTable,
    tx: Sender<SignalBatch>,
}

impl Viewport {
    /// A viewport and the receiving end of its signal channel.
    /// `capable = false` models a host without visibility tracking.
    pub fn new(capable: bool) -> (Self, Receiver<SignalBatch>) {
        let (tx, rx) = mpsc::channel();
        let viewport = Viewport {
            capable,
            scroll: 0,
            height: 0,
            page_height: 0,
            spans: HashMap::new(),
            table: SubscriptionTable::default(),
            tx,
        };
        (viewport, rx)
    }

    /// Replace the laid-out element spans (after a relayout).
    pub fn set_layout(&mut self, spans: HashMap<String, (usize, usize)>, page_height: usize) {
        self.spans = spans;
        self.page_height = page_height;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_scroll(&self) -> usize {
        self.page_height.saturating_sub(self.height)
    }

    /// Scroll by `delta` rows, clamped to the page. Returns whether it moved.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let target = self.scroll.saturating_add_signed(delta).min(self.max_scroll());
        let moved = target != self.scroll;
        self.scroll = target;
        moved
    }

    pub fn scroll_to_row(&mut self, row: usize) -> bool {
        let target = row.min(self.max_scroll());
        let moved = target != self.scroll;
        self.scroll = target;
        moved
    }

    /// Bring an element's top row to the top of the window (as far as the page allows).
    pub fn scroll_to(&mut self, element_id: &str) -> bool {
        match self.spans.get(element_id) {
            Some(&(top, _)) => {
                self.scroll_to_row(top);
                true
            }
            None => false,
        }
    }

    /// Scroll the least amount that puts the whole element in view
    /// (or its top, when it is taller than the window).
    pub fn ensure_visible(&mut self, element_id: &str) -> bool {
        let Some(&(top, height)) = self.spans.get(element_id) else {
            return false;
        };
        if top < self.scroll || height > self.height {
            self.scroll_to_row(top);
        } else if top + height > self.scroll + self.height {
            self.scroll_to_row(top + height - self.height);
        }
        true
    }

    /// Fraction of the element currently inside the window
    pub fn ratio(&self, element_id: &str) -> Option<f32> {
        let &(top, height) = self.spans.get(element_id)?;
        Some(visible_ratio(top, height, self.scroll, self.height))
    }

    /// Measure every live subscription and queue the resulting batches.
    /// Returns how many batches were queued.
    pub fn measure(&mut self) -> usize {
        if !self.capable {
            return 0;
        }
        let spans = &self.spans;
        let (scroll, height) = (self.scroll, self.height);
        let batches = self.table.measure(|id| {
            spans
                .get(id)
                .map(|&(top, h)| visible_ratio(top, h, scroll, height))
        });
        let mut sent = 0;
        for batch in batches {
            if self.tx.send(batch).is_ok() {
                sent += 1;
            }
        }
        sent
    }

    pub fn is_live(&self, subscription: SubscriptionId) -> bool {
        self.table.is_live(subscription)
    }

    pub fn subscriptions(&self) -> usize {
        self.table.len()
    }

    pub fn observed(&self, subscription: SubscriptionId) -> Vec<&str> {
        self.table.observed(subscription)
    }
}

impl VisibilityHost for Viewport {
    fn supports_visibility(&self) -> bool {
        self.capable
    }

    fn resolves(&self, element_id: &str) -> bool {
        self.spans.contains_key(element_id)
    }

    fn subscribe(&mut self, element_ids: &[String], thresholds: &[f32]) -> SubscriptionId {
        let id = self.table.insert(element_ids, thresholds);
        tracing::trace!(subscription = %id, elements = element_ids.len(), "subscribe");
        id
    }

    fn unobserve(&mut self, subscription: SubscriptionId, element_id: &str) {
        self.table.remove_element(subscription, element_id);
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        if self.table.remove(subscription) {
            tracing::trace!(subscription = %subscription, "unsubscribe");
        }
    }
}

/// Visible fraction of rows `top..top + height` inside `scroll..scroll + window`.
pub fn visible_ratio(top: usize, height: usize, scroll: usize, window: usize) -> f32 {
    if height == 0 {
        return 0.0;
    }
    let start = top.max(scroll);
    let end = (top + height).min(scroll + window);
    if end <= start {
        return 0.0;
    }
    (end - start) as f32 / height as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(items: &[(&str, usize, usize)]) -> HashMap<String, (usize, usize)> {
        items
            .iter()
            .map(|&(id, top, h)| (id.to_string(), (top, h)))
            .collect()
    }

    fn viewport(height: usize) -> (Viewport, Receiver<SignalBatch>) {
        let (mut vp, rx) = Viewport::new(true);
        vp.set_layout(spans(&[("a", 0, 10), ("b", 11, 10), ("c", 22, 10)]), 32);
        vp.set_height(height);
        (vp, rx)
    }

    #[test]
    fn ratio_of_partial_overlap() {
        assert_eq!(visible_ratio(0, 10, 0, 5), 0.5);
        assert_eq!(visible_ratio(10, 10, 0, 10), 0.0);
        assert_eq!(visible_ratio(5, 10, 10, 20), 0.5);
        assert_eq!(visible_ratio(0, 4, 0, 20), 1.0);
        assert_eq!(visible_ratio(0, 0, 0, 20), 0.0);
    }

    #[test]
    fn scrolling_is_clamped() {
        let (mut vp, _rx) = viewport(12);
        assert_eq!(vp.max_scroll(), 20);
        assert!(vp.scroll_by(100));
        assert_eq!(vp.scroll(), 20);
        assert!(!vp.scroll_by(1));
        assert!(vp.scroll_by(-100));
        assert_eq!(vp.scroll(), 0);
    }

    #[test]
    fn scroll_to_unknown_element_is_refused() {
        let (mut vp, _rx) = viewport(12);
        assert!(vp.scroll_to("b"));
        assert_eq!(vp.scroll(), 11);
        assert!(!vp.scroll_to("zzz"));
        assert_eq!(vp.scroll(), 11);
    }

    #[test]
    fn ensure_visible_scrolls_minimally() {
        let (mut vp, _rx) = viewport(12);
        vp.ensure_visible("b");
        // b spans 11..21; the window must end at 21
        assert_eq!(vp.scroll(), 9);
        vp.ensure_visible("a");
        assert_eq!(vp.scroll(), 0);
    }

    #[test]
    fn measure_queues_initial_and_changed_bands_only() {
        let (mut vp, rx) = viewport(12);
        let sub = vp.subscribe(&["a".into(), "c".into()], &[0.12]);
        assert_eq!(vp.measure(), 1);
        let batch = rx.try_recv().unwrap();
        assert_eq!(batch.subscription, sub);
        let got: Vec<(&str, bool)> = batch
            .signals
            .iter()
            .map(|s| (s.element_id.as_str(), s.intersecting))
            .collect();
        assert_eq!(got, vec![("a", true), ("c", false)]);

        // Nothing changed band
        assert_eq!(vp.measure(), 0);

        vp.scroll_by(20);
        assert_eq!(vp.measure(), 1);
        let batch = rx.try_recv().unwrap();
        let got: Vec<(&str, bool)> = batch
            .signals
            .iter()
            .map(|s| (s.element_id.as_str(), s.intersecting))
            .collect();
        assert_eq!(got, vec![("a", false), ("c", true)]);
    }

    #[test]
    fn released_subscription_produces_nothing() {
        let (mut vp, rx) = viewport(12);
        let sub = vp.subscribe(&["a".into()], &[0.12]);
        vp.unsubscribe(sub);
        assert_eq!(vp.measure(), 0);
        assert!(rx.try_recv().is_err());
        assert!(!vp.is_live(sub));
    }

    #[test]
    fn incapable_viewport_never_signals() {
        let (mut vp, rx) = Viewport::new(false);
        vp.set_layout(spans(&[("a", 0, 10)]), 10);
        vp.set_height(10);
        vp.subscribe(&["a".into()], &[0.12]);
        assert_eq!(vp.measure(), 0);
        assert!(rx.try_recv().is_err());
        assert!(!vp.supports_visibility());
    }

    #[test]
    fn unresolved_elements_wait_for_layout() {
        let (mut vp, rx) = viewport(12);
        let sub = vp.subscribe(&["late".into()], &[0.12]);
        assert_eq!(vp.measure(), 0);
        vp.set_layout(spans(&[("late", 0, 4)]), 32);
        assert_eq!(vp.measure(), 1);
        assert_eq!(rx.try_recv().unwrap().subscription, sub);
    }
}
