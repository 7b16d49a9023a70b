//! One-shot reveal tracking for rendered blocks.
//!
//! Each tracked element is `Pending` until the host reports it intersecting,
//! then `Revealed` for as long as it stays rendered. Revealed elements are
//! never observed again. Elements that leave the rendered set are forgotten;
//! if they come back they start over as `Pending`.

use indexmap::IndexMap;
use serde::Serialize;

use super::visibility::{SignalBatch, SubscriptionId, VisibilityHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealPhase {
    Pending,
    Revealed,
}

#[derive(Debug)]
pub struct RevealTracker {
    threshold: f32,
    /// Tracked elements in rendered order
    states: IndexMap<String, RevealPhase>,
    subscription: Option<SubscriptionId>,
}

impl RevealTracker {
    pub fn new(threshold: f32) -> Self {
        RevealTracker {
            threshold,
            states: IndexMap::new(),
            subscription: None,
        }
    }

    /// Recompute tracking for a new rendered set.
    ///
    /// Releases the previous subscription, forgets elements no longer rendered,
    /// adds new ones as `Pending`, and observes only what is still pending.
    /// Ids the host cannot resolve are skipped. Without visibility support
    /// every element is revealed on the spot. Returns the number of elements
    /// now observed.
    pub fn register<H>(&mut self, host: &mut H, rendered: &[String]) -> usize
    where
        H: VisibilityHost + ?Sized,
    {
        self.release(host);

        let mut next: IndexMap<String, RevealPhase> = IndexMap::with_capacity(rendered.len());
        for id in rendered {
            if !host.resolves(id) {
                tracing::debug!(element = %id, "reveal target not rendered, skipping");
                continue;
            }
            let phase = self
                .states
                .get(id)
                .copied()
                .unwrap_or(RevealPhase::Pending);
            next.entry(id.clone()).or_insert(phase);
        }
        let dropped = self.states.keys().filter(|k| !next.contains_key(*k)).count();
        self.states = next;

        if !host.supports_visibility() {
            for phase in self.states.values_mut() {
                *phase = RevealPhase::Revealed;
            }
            tracing::debug!(
                revealed = self.states.len(),
                "no visibility support, revealing everything"
            );
            return 0;
        }

        let pending: Vec<String> = self.pending().map(String::from).collect();
        if !pending.is_empty() {
            let sub = host.subscribe(&pending, &[self.threshold]);
            self.subscription = Some(sub);
        }
        tracing::debug!(
            tracked = self.states.len(),
            observed = pending.len(),
            dropped,
            subscription = ?self.subscription,
            "reveal tracker registered"
        );
        pending.len()
    }

    /// Apply one delivered batch. Returns the ids revealed by it.
    pub fn handle_batch<H>(&mut self, host: &mut H, batch: &SignalBatch) -> Vec<String>
    where
        H: VisibilityHost + ?Sized,
    {
        let Some(sub) = self.subscription else {
            return Vec::new();
        };
        if batch.subscription != sub {
            tracing::trace!(batch = %batch.subscription, current = %sub, "stale reveal batch ignored");
            return Vec::new();
        }

        let mut revealed = Vec::new();
        for signal in &batch.signals {
            if signal.intersecting && self.transition(&signal.element_id) {
                host.unobserve(sub, &signal.element_id);
                revealed.push(signal.element_id.clone());
            }
        }
        if !revealed.is_empty() {
            tracing::debug!(count = revealed.len(), "revealed");
        }
        if self.pending().next().is_none() {
            self.release(host);
        }
        revealed
    }

    /// Drop the live subscription, if any. Tracked phases are kept.
    pub fn release<H>(&mut self, host: &mut H)
    where
        H: VisibilityHost + ?Sized,
    {
        if let Some(sub) = self.subscription.take() {
            host.unsubscribe(sub);
        }
    }

    pub fn phase(&self, element_id: &str) -> Option<RevealPhase> {
        self.states.get(element_id).copied()
    }

    pub fn is_revealed(&self, element_id: &str) -> bool {
        self.phase(element_id) == Some(RevealPhase::Revealed)
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    pub fn tracked(&self) -> impl Iterator<Item = (&str, RevealPhase)> {
        self.states.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.states
            .iter()
            .filter(|(_, p)| **p == RevealPhase::Pending)
            .map(|(k, _)| k.as_str())
    }

    pub fn revealed_count(&self) -> usize {
        self.states
            .values()
            .filter(|p| **p == RevealPhase::Revealed)
            .count()
    }

    /// Pending -> Revealed. The only transition there is.
    fn transition(&mut self, element_id: &str) -> bool {
        match self.states.get_mut(element_id) {
            Some(phase @ RevealPhase::Pending) => {
                *phase = RevealPhase::Revealed;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::visibility::testing::{FakeHost, batch};

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn register_observes_every_rendered_element_as_pending() {
        let mut host = FakeHost::new(&["a", "b", "c"]);
        let mut tracker = RevealTracker::new(0.12);

        assert_eq!(tracker.register(&mut host, &ids(&["a", "b", "c"])), 3);
        let sub = tracker.subscription().unwrap();
        assert_eq!(host.observed(sub), vec!["a", "b", "c"]);
        assert_eq!(tracker.phase("b"), Some(RevealPhase::Pending));
    }

    #[test]
    fn intersecting_signal_reveals_and_unobserves() {
        let mut host = FakeHost::new(&["a", "b"]);
        let mut tracker = RevealTracker::new(0.12);
        tracker.register(&mut host, &ids(&["a", "b"]));
        let sub = tracker.subscription().unwrap();

        let revealed = tracker.handle_batch(&mut host, &batch(sub, &[("a", true, 0.4), ("b", false, 0.0)]));
        assert_eq!(revealed, vec!["a"]);
        assert!(tracker.is_revealed("a"));
        assert!(!tracker.is_revealed("b"));
        assert_eq!(host.unobserved, vec![(sub, "a".to_string())]);
        assert_eq!(host.observed(sub), vec!["b"]);
    }

    #[test]
    fn revealed_never_reverts() {
        let mut host = FakeHost::new(&["a", "b"]);
        let mut tracker = RevealTracker::new(0.12);
        tracker.register(&mut host, &ids(&["a", "b"]));
        let sub = tracker.subscription().unwrap();

        tracker.handle_batch(&mut host, &batch(sub, &[("a", true, 1.0)]));
        tracker.handle_batch(&mut host, &batch(sub, &[("a", false, 0.0), ("a", true, 0.5)]));
        assert!(tracker.is_revealed("a"));
        // second intersecting report is a no-op
        assert_eq!(host.unobserved.len(), 1);
    }

    #[test]
    fn last_reveal_releases_subscription() {
        let mut host = FakeHost::new(&["a"]);
        let mut tracker = RevealTracker::new(0.12);
        tracker.register(&mut host, &ids(&["a"]));
        let sub = tracker.subscription().unwrap();

        tracker.handle_batch(&mut host, &batch(sub, &[("a", true, 0.2)]));
        assert_eq!(tracker.subscription(), None);
        assert_eq!(host.released, vec![sub]);
        assert!(host.table.is_empty());
    }

    #[test]
    fn stale_batches_are_ignored_after_reregistration() {
        let mut host = FakeHost::new(&["a", "b"]);
        let mut tracker = RevealTracker::new(0.12);
        tracker.register(&mut host, &ids(&["a", "b"]));
        let old = tracker.subscription().unwrap();
        tracker.register(&mut host, &ids(&["a", "b"]));
        let new = tracker.subscription().unwrap();
        assert_ne!(old, new);
        assert_eq!(host.released, vec![old]);
        assert_eq!(host.table.len(), 1);

        assert!(tracker.handle_batch(&mut host, &batch(old, &[("a", true, 1.0)])).is_empty());
        assert!(!tracker.is_revealed("a"));
    }

    #[test]
    fn reregistration_skips_revealed_and_adds_new_pending() {
        let mut host = FakeHost::new(&["a", "b", "c"]);
        let mut tracker = RevealTracker::new(0.12);
        tracker.register(&mut host, &ids(&["a", "b"]));
        let sub = tracker.subscription().unwrap();
        tracker.handle_batch(&mut host, &batch(sub, &[("a", true, 0.9)]));

        // filter change: "c" appears, "a" stays, "b" stays
        assert_eq!(tracker.register(&mut host, &ids(&["a", "b", "c"])), 2);
        let sub = tracker.subscription().unwrap();
        assert_eq!(host.observed(sub), vec!["b", "c"]);
        assert!(tracker.is_revealed("a"));
        assert_eq!(tracker.phase("c"), Some(RevealPhase::Pending));
    }

    #[test]
    fn reregistration_with_everything_revealed_subscribes_nothing() {
        let mut host = FakeHost::new(&["a"]);
        let mut tracker = RevealTracker::new(0.12);
        tracker.register(&mut host, &ids(&["a"]));
        let sub = tracker.subscription().unwrap();
        tracker.handle_batch(&mut host, &batch(sub, &[("a", true, 0.3)]));

        assert_eq!(tracker.register(&mut host, &ids(&["a"])), 0);
        assert_eq!(tracker.subscription(), None);
        assert!(host.table.is_empty());
    }

    #[test]
    fn filtered_out_elements_are_dropped_and_restart_pending() {
        let mut host = FakeHost::new(&["a", "b"]);
        let mut tracker = RevealTracker::new(0.12);
        tracker.register(&mut host, &ids(&["a", "b"]));
        let sub = tracker.subscription().unwrap();
        tracker.handle_batch(&mut host, &batch(sub, &[("b", true, 0.5)]));

        tracker.register(&mut host, &ids(&["a"]));
        assert_eq!(tracker.phase("b"), None);
        assert_eq!(tracker.tracked().count(), 1);

        tracker.register(&mut host, &ids(&["a", "b"]));
        assert_eq!(tracker.phase("b"), Some(RevealPhase::Pending));
    }

    #[test]
    fn unresolved_ids_are_silently_skipped() {
        let mut host = FakeHost::new(&["a"]);
        let mut tracker = RevealTracker::new(0.12);
        assert_eq!(tracker.register(&mut host, &ids(&["a", "ghost"])), 1);
        assert_eq!(tracker.phase("ghost"), None);
    }

    #[test]
    fn without_capability_everything_is_revealed_immediately() {
        let mut host = FakeHost::incapable(&["a", "b"]);
        let mut tracker = RevealTracker::new(0.12);
        assert_eq!(tracker.register(&mut host, &ids(&["a", "b"])), 0);
        assert!(tracker.is_revealed("a"));
        assert!(tracker.is_revealed("b"));
        assert_eq!(tracker.subscription(), None);
        assert!(host.table.is_empty());
    }

    #[test]
    fn signals_for_untracked_elements_are_ignored() {
        let mut host = FakeHost::new(&["a"]);
        let mut tracker = RevealTracker::new(0.12);
        tracker.register(&mut host, &ids(&["a"]));
        let sub = tracker.subscription().unwrap();
        assert!(tracker.handle_batch(&mut host, &batch(sub, &[("zzz", true, 1.0)])).is_empty());
        assert_eq!(tracker.phase("zzz"), None);
    }

    #[test]
    fn repeated_signals_reveal_once() {
        let mut host = FakeHost::new(&["a", "b"]);
        let mut tracker = RevealTracker::new(0.12);
        tracker.register(&mut host, &ids(&["a", "b"]));
        let sub = tracker.subscription().unwrap();
        let first = tracker.handle_batch(&mut host, &batch(sub, &[("a", true, 0.2), ("a", true, 0.9)]));
        assert_eq!(first, vec!["a"]);
        assert_eq!(host.observed(sub), vec!["b"]);
        assert!(tracker.handle_batch(&mut host, &batch(sub, &[("a", true, 1.0)])).is_empty());
        assert_eq!(tracker.revealed_count(), 1);
    }
}
