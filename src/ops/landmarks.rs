use super::visibility::{SignalBatch, SubscriptionId, VisibilityHost};

/// Landmark used when none are configured
pub const FALLBACK_LANDMARK: &str = "home";

/// Tracks which fixed page landmark is "current" for navigation highlighting.
///
/// The most visible intersecting landmark of each batch wins; equal ratios go
/// to the later signal. A batch with nothing intersecting changes nothing.
#[derive(Debug)]
pub struct SectionActivityTracker {
    landmarks: Vec<String>,
    thresholds: Vec<f32>,
    active: String,
    subscription: Option<SubscriptionId>,
}

impl SectionActivityTracker {
    pub fn new(landmarks: &[String], thresholds: &[f32]) -> Self {
        let active = landmarks
            .first()
            .cloned()
            .unwrap_or_else(|| FALLBACK_LANDMARK.to_string());
        SectionActivityTracker {
            landmarks: landmarks.to_vec(),
            thresholds: thresholds.to_vec(),
            active,
            subscription: None,
        }
    }

    /// Observe every configured landmark that currently resolves. Replaces any
    /// earlier subscription. Without visibility support the active landmark
    /// simply stays where it is.
    pub fn register<H>(&mut self, host: &mut H) -> usize
    where
        H: VisibilityHost + ?Sized,
    {
        self.release(host);
        if !host.supports_visibility() {
            tracing::debug!(active = %self.active, "no visibility support, active landmark frozen");
            return 0;
        }

        let resolved: Vec<String> = self
            .landmarks
            .iter()
            .filter(|id| {
                let ok = host.resolves(id);
                if !ok {
                    tracing::warn!(landmark = %id, "landmark not rendered, skipping");
                }
                ok
            })
            .cloned()
            .collect();
        if resolved.is_empty() {
            return 0;
        }
        self.subscription = Some(host.subscribe(&resolved, &self.thresholds));
        resolved.len()
    }

    /// Apply one delivered batch. Returns the new active landmark if it changed.
    pub fn handle_batch(&mut self, batch: &SignalBatch) -> Option<&str> {
        if self.subscription != Some(batch.subscription) {
            tracing::trace!(batch = %batch.subscription, "stale landmark batch ignored");
            return None;
        }

        let mut best: Option<(&str, f32)> = None;
        for signal in batch.signals.iter().filter(|s| s.intersecting) {
            match best {
                Some((_, ratio)) if signal.ratio < ratio => {}
                _ => best = Some((signal.element_id.as_str(), signal.ratio)),
            }
        }

        let (winner, ratio) = best?;
        if winner == self.active {
            return None;
        }
        let winner = winner.to_string();
        tracing::debug!(from = %self.active, to = %winner, ratio, "active landmark changed");
        self.active = winner;
        Some(self.active.as_str())
    }

    pub fn release<H>(&mut self, host: &mut H)
    where
        H: VisibilityHost + ?Sized,
    {
        if let Some(sub) = self.subscription.take() {
            host.unsubscribe(sub);
        }
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn landmarks(&self) -> &[String] {
        &self.landmarks
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }
}
