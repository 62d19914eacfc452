//! Double-press detection with injected timestamps

use std::time::{Duration, Instant};

use crate::store::ItemId;

pub const DEFAULT_DOUBLE_CLICK: Duration = Duration::from_millis(300);

/// Detects two presses on the same target within a time window
///
/// The detector never reads the clock itself; callers pass the event
/// timestamp. After a double press fires the detector resets, so a third
/// quick press starts a new sequence.
#[derive(Debug, Clone)]
pub struct DoubleClickDetector<K = ItemId> {
    window: Duration,
    last: Option<(K, Instant)>,
}

impl<K: Copy + PartialEq> DoubleClickDetector<K> {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    #[inline]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a press on `target`; true when it completes a double press
    pub fn press(&mut self, target: K, at: Instant) -> bool {
        let is_double = match self.last {
            Some((prev, prev_at)) => {
                prev == target && at.saturating_duration_since(prev_at) < self.window
            }
            None => false,
        };

        self.last = if is_double { None } else { Some((target, at)) };
        is_double
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl<K: Copy + PartialEq> Default for DoubleClickDetector<K> {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_CLICK)
    }
}
