use std::time::{Duration, Instant};

/// A single pending firing carrying a payload.
///
/// Scheduling again replaces the pending firing; the old payload is dropped and
/// never fires. The owner polls with the current time from its event loop.
#[derive(Debug)]
pub struct OneShotTimer<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Default for OneShotTimer<T> {
    fn default() -> Self {
        OneShotTimer { pending: None }
    }
}

impl<T> OneShotTimer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire `delay` after `now`. Returns true if a pending
    /// firing was superseded.
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> bool {
        self.pending.replace((now + delay, payload)).is_some()
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the firing, zero if overdue
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(deadline, _)| deadline.saturating_duration_since(now))
    }

    /// Fire if due. A fired timer is empty afterwards.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.cancel(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_when_due() {
        let start = Instant::now();
        let mut timer = OneShotTimer::new();
        timer.schedule(start, Duration::from_millis(40), "settle");

        assert_eq!(timer.poll(start + Duration::from_millis(10)), None);
        assert_eq!(timer.poll(start + Duration::from_millis(40)), Some("settle"));
        assert_eq!(timer.poll(start + Duration::from_millis(80)), None);
        assert!(!timer.is_pending());
    }

    #[test]
    fn rescheduling_supersedes_pending() {
        let start = Instant::now();
        let mut timer = OneShotTimer::new();
        assert!(!timer.schedule(start, Duration::from_millis(40), 1));
        assert!(timer.schedule(start + Duration::from_millis(30), Duration::from_millis(40), 2));

        assert_eq!(timer.poll(start + Duration::from_millis(50)), None);
        assert_eq!(timer.poll(start + Duration::from_millis(70)), Some(2));
    }

    #[test]
    fn cancel_returns_payload_and_clears() {
        let start = Instant::now();
        let mut timer = OneShotTimer::new();
        timer.schedule(start, Duration::ZERO, 'x');
        assert_eq!(timer.remaining(start), Some(Duration::ZERO));
        assert_eq!(timer.cancel(), Some('x'));
        assert_eq!(timer.poll(start + Duration::from_secs(1)), None);
    }
}
