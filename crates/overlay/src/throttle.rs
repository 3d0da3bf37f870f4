//! Animation-frame coalescing for scroll and resize recomputes.
use serde::{Deserialize, Serialize};

/// What asked for a layout recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Scroll,
    Resize,
}

/// At most one pending recompute per frame. A request made while one is
/// already pending replaces the pending trigger and is counted as coalesced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameThrottle {
    pending: Option<Trigger>,
    coalesced: u64,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a trigger. Returns true when the caller has to schedule a
    /// frame callback, false when one is already scheduled.
    pub fn request(&mut self, trigger: Trigger) -> bool {
        let was_idle = self.pending.is_none();
        if !was_idle {
            self.coalesced += 1;
        }
        self.pending = Some(trigger);
        was_idle
    }

    /// Called from the frame callback; yields the latest trigger and rearms.
    pub fn take(&mut self) -> Option<Trigger> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Requests absorbed into an already scheduled frame since creation.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_schedules_a_frame() {
        let mut throttle = FrameThrottle::new();
        assert!(throttle.request(Trigger::Scroll));
        assert!(throttle.is_pending());
    }

    #[test]
    fn burst_collapses_to_latest() {
        let mut throttle = FrameThrottle::new();
        assert!(throttle.request(Trigger::Scroll));
        assert!(!throttle.request(Trigger::Scroll));
        assert!(!throttle.request(Trigger::Resize));
        assert_eq!(throttle.take(), Some(Trigger::Resize));
        assert_eq!(throttle.take(), None);
        assert_eq!(throttle.coalesced(), 2);
    }

    #[test]
    fn rearms_after_frame() {
        let mut throttle = FrameThrottle::new();
        throttle.request(Trigger::Resize);
        throttle.take();
        assert!(!throttle.is_pending());
        assert!(throttle.request(Trigger::Scroll));
    }
}
