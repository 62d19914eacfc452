//! Grid snapping for tick positions

use serde::Serialize;

/// Ticks per quarter note used when nothing else is configured
pub const DEFAULT_TIMEBASE: u32 = 480;

/// Snaps ticks to a grid derived from the timebase and a note denominator
///
/// A denominator of 16 gives a sixteenth-note grid (`timebase * 4 / 16`
/// ticks). Quantizers are plain values: changing the denominator builds a
/// new quantizer and only affects placements made afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quantizer {
    timebase: u32,
    denominator: u32,
    enabled: bool,
}

impl Quantizer {
    /// Create an enabled quantizer. A zero denominator is treated as 1.
    pub fn new(timebase: u32, denominator: u32) -> Self {
        Self {
            timebase: timebase.max(1),
            denominator: denominator.max(1),
            enabled: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_denominator(mut self, denominator: u32) -> Self {
        self.denominator = denominator.max(1);
        self
    }

    #[inline]
    pub fn timebase(&self) -> u32 {
        self.timebase
    }

    #[inline]
    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Grid spacing in ticks
    #[inline]
    pub fn unit(&self) -> f64 {
        (self.timebase as f64 * 4.0) / self.denominator as f64
    }

    /// Snap to the nearest grid line; exact halves go to the lower line
    pub fn round(&self, tick: f64) -> f64 {
        if !self.enabled {
            return tick;
        }
        let unit = self.unit();
        (tick / unit - 0.5).ceil() * unit + 0.0
    }

    /// Snap down to the grid line at or before `tick`
    pub fn floor(&self, tick: f64) -> f64 {
        if !self.enabled {
            return tick;
        }
        let unit = self.unit();
        (tick / unit).floor() * unit
    }

    /// Snap up to the grid line at or after `tick`
    pub fn ceil(&self, tick: f64) -> f64 {
        if !self.enabled {
            return tick;
        }
        let unit = self.unit();
        (tick / unit).ceil() * unit + 0.0
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEBASE, 16)
    }
}
