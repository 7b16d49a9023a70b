//! Boundary to the host's visibility-subscription service.
//!
//! A host owns the real rendering surface. Trackers register the element ids
//! they care about and receive [`SignalBatch`]es later, delivered one batch at
//! a time by whatever loop drains the host's channel. Every batch carries the
//! [`SubscriptionId`] it was produced for, so a tracker can drop batches that
//! belong to a subscription it has already released.

use std::collections::HashMap;
use std::fmt;

/// Handle for one registration with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// One element's visibility report
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilitySignal {
    pub element_id: String,
    /// Visible at or above the subscription's smallest threshold
    pub intersecting: bool,
    /// Visible fraction of the element, 0.0..=1.0
    pub ratio: f32,
}

impl VisibilitySignal {
    pub fn new(element_id: &str, intersecting: bool, ratio: f32) -> Self {
        VisibilitySignal {
            element_id: element_id.to_string(),
            intersecting,
            ratio,
        }
    }
}

/// Signals produced by one measurement pass for one subscription, in delivery order
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBatch {
    pub subscription: SubscriptionId,
    pub signals: Vec<VisibilitySignal>,
}

/// The host side of visibility tracking.
pub trait VisibilityHost {
    /// False when the host cannot deliver visibility signals at all.
    fn supports_visibility(&self) -> bool;

    /// Whether `element_id` currently resolves to a rendered element.
    fn resolves(&self, element_id: &str) -> bool;

    /// Start observing `element_ids`. Signals arrive later as [`SignalBatch`]es.
    fn subscribe(&mut self, element_ids: &[String], thresholds: &[f32]) -> SubscriptionId;

    /// Stop observing one element of a live subscription.
    fn unobserve(&mut self, subscription: SubscriptionId, element_id: &str);

    /// Release a subscription. No batch for it is delivered afterwards.
    fn unsubscribe(&mut self, subscription: SubscriptionId);
}

/// Which threshold band a ratio falls in: `None` below the smallest threshold,
/// otherwise the index of the highest threshold reached.
pub fn threshold_band(ratio: f32, thresholds: &[f32]) -> Option<usize> {
    thresholds.iter().rposition(|&t| ratio >= t && ratio > 0.0)
}

/// Sort and dedup thresholds, clamping into `0.0..=1.0`. An empty list becomes `[0.0]`.
pub fn normalize_thresholds(thresholds: &[f32]) -> Vec<f32> {
    let mut out: Vec<f32> = thresholds
        .iter()
        .filter(|t| !t.is_nan())
        .map(|t| t.clamp(0.0, 1.0))
        .collect();
    out.sort_by(|a, b| a.total_cmp(b));
    out.dedup();
    if out.is_empty() {
        out.push(0.0);
    }
    out
}

/// Per-subscription bookkeeping shared by host implementations: which elements are
/// observed, under which thresholds, and the last band reported for each.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionTable {
    next_id: u64,
    subscriptions: HashMap<SubscriptionId, Observed>,
}

#[derive(Debug, Clone)]
struct Observed {
    thresholds: Vec<f32>,
    /// element id -> last reported band (`None` inside = reported as not intersecting,
    /// missing from the map = never measured)
    elements: Vec<(String, Option<Option<usize>>)>,
}

impl SubscriptionTable {
    pub fn insert(&mut self, element_ids: &[String], thresholds: &[f32]) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        let mut elements: Vec<(String, Option<Option<usize>>)> = Vec::new();
        for element_id in element_ids {
            if !elements.iter().any(|(e, _)| e == element_id) {
                elements.push((element_id.clone(), None));
            }
        }
        self.subscriptions.insert(
            id,
            Observed {
                thresholds: normalize_thresholds(thresholds),
                elements,
            },
        );
        id
    }

    pub fn remove_element(&mut self, subscription: SubscriptionId, element_id: &str) {
        if let Some(observed) = self.subscriptions.get_mut(&subscription) {
            observed.elements.retain(|(e, _)| e != element_id);
        }
    }

    pub fn remove(&mut self, subscription: SubscriptionId) -> bool {
        self.subscriptions.remove(&subscription).is_some()
    }

    pub fn is_live(&self, subscription: SubscriptionId) -> bool {
        self.subscriptions.contains_key(&subscription)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Element ids observed by a subscription, in registration order
    pub fn observed(&self, subscription: SubscriptionId) -> Vec<&str> {
        self.subscriptions
            .get(&subscription)
            .map(|o| o.elements.iter().map(|(e, _)| e.as_str()).collect())
            .unwrap_or_default()
    }

    /// Measure every live subscription with `ratio_of` and return one batch per
    /// subscription whose elements changed band (or were never measured).
    /// Batches come out in subscription order; signals in registration order.
    pub fn measure<F>(&mut self, mut ratio_of: F) -> Vec<SignalBatch>
    where
        F: FnMut(&str) -> Option<f32>,
    {
        let mut ids: Vec<SubscriptionId> = self.subscriptions.keys().copied().collect();
        ids.sort();

        let mut batches = Vec::new();
        for id in ids {
            let Some(observed) = self.subscriptions.get_mut(&id) else {
                continue;
            };
            let mut signals = Vec::new();
            for (element_id, last) in observed.elements.iter_mut() {
                // Unresolved elements produce nothing until they are laid out
                let Some(ratio) = ratio_of(element_id) else {
                    continue;
                };
                let band = threshold_band(ratio, &observed.thresholds);
                if *last != Some(band) {
                    *last = Some(band);
                    signals.push(VisibilitySignal::new(element_id, band.is_some(), ratio));
                }
            }
            if !signals.is_empty() {
                batches.push(SignalBatch {
                    subscription: id,
                    signals,
                });
            }
        }
        batches
    }
}
