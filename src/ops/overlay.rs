use crate::model::entry::EntryLink;

/// Landmark scrolled to by "return to catalog"
pub const CATALOG_LANDMARK: &str = "projects";

/// The ways a user can dismiss the detail overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    /// Close button / Esc
    Explicit,
    /// Click or tap outside the overlay's content
    Outside,
    /// "Back to projects": closes and asks the host to scroll to the catalog
    ReturnToCatalog,
}

/// Host work requested by a close
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseEffect {
    ScrollTo(String),
}

/// Holds the one entry (by catalog index) whose details are on screen.
#[derive(Debug, Default)]
pub struct DetailOverlay {
    selected: Option<usize>,
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an entry, replacing whatever was open.
    pub fn select_entry(&mut self, index: usize) {
        if let Some(prev) = self.selected.replace(index) {
            tracing::debug!(from = prev, to = index, "overlay replaced");
        } else {
            tracing::debug!(entry = index, "overlay opened");
        }
    }

    /// Open from a link on an entry card. Only `detail` links open the overlay.
    pub fn open_from_link(&mut self, index: usize, link: &EntryLink) -> bool {
        if !link.is_detail() {
            return false;
        }
        self.select_entry(index);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Close by any trigger. All of them clear the selection; only
    /// `ReturnToCatalog` carries a host effect. Closing nothing is a no-op.
    pub fn close(&mut self, trigger: CloseTrigger) -> Option<CloseEffect> {
        let index = self.selected.take()?;
        tracing::debug!(entry = index, ?trigger, "overlay closed");
        match trigger {
            CloseTrigger::ReturnToCatalog => Some(CloseEffect::ScrollTo(CATALOG_LANDMARK.to_string())),
            CloseTrigger::Explicit | CloseTrigger::Outside => None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        assert!(!DetailOverlay::new().is_open());
    }

    #[test]
    fn selecting_again_replaces_without_stacking() {
        let mut overlay = DetailOverlay::new();
        overlay.select_entry(0);
        overlay.select_entry(3);
        assert_eq!(overlay.selected(), Some(3));
        overlay.close(CloseTrigger::Explicit);
        assert_eq!(overlay.selected(), None);
    }

    #[test]
    fn every_close_trigger_clears_selection() {
        for trigger in [
            CloseTrigger::Explicit,
            CloseTrigger::Outside,
            CloseTrigger::ReturnToCatalog,
        ] {
            let mut overlay = DetailOverlay::new();
            overlay.select_entry(1);
            overlay.close(trigger);
            assert_eq!(overlay.selected(), None, "{:?}", trigger);
        }
    }

    #[test]
    fn only_return_to_catalog_requests_scroll() {
        let mut overlay = DetailOverlay::new();
        overlay.select_entry(1);
        assert_eq!(
            overlay.close(CloseTrigger::ReturnToCatalog),
            Some(CloseEffect::ScrollTo("projects".into()))
        );
        overlay.select_entry(1);
        assert_eq!(overlay.close(CloseTrigger::Outside), None);
    }

    #[test]
    fn closing_when_closed_has_no_effect() {
        let mut overlay = DetailOverlay::new();
        assert_eq!(overlay.close(CloseTrigger::ReturnToCatalog), None);
    }

    #[test]
    fn external_links_do_not_open() {
        let mut overlay = DetailOverlay::new();
        assert!(!overlay.open_from_link(2, &EntryLink::external("GitHub", "https://x")));
        assert!(!overlay.is_open());
        assert!(overlay.open_from_link(2, &EntryLink::detail("Details")));
        assert_eq!(overlay.selected(), Some(2));
    }

    #[test]
    fn reopen_after_close_is_fresh() {
        let mut overlay = DetailOverlay::new();
        overlay.select_entry(4);
        overlay.close(CloseTrigger::Outside);
        overlay.select_entry(0);
        assert_eq!(overlay.selected(), Some(0));
    }
}
