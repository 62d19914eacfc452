//! Pointer input types
//!
//! These mirror what the window backend reports, without depending on it.
//! The host converts its native events into [`PointerEvent`] before
//! dispatching.

use std::time::Instant;

use serde::Serialize;

use crate::geometry::PixelPoint;

/// Physical pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PointerButton {
    /// Left button
    Primary,
    /// Middle button / wheel press
    Auxiliary,
    /// Right button
    Secondary,
}

/// Keyboard modifiers held during the event, passed through untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Platform command key (ctrl elsewhere, cmd on macOS)
    #[inline]
    pub fn command(&self) -> bool {
        if cfg!(target_os = "macos") {
            self.meta
        } else {
            self.ctrl
        }
    }
}

/// A pointer event with everything the gesture handlers need
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub button: PointerButton,
    /// Position relative to the window, used for drag deltas
    pub client: PixelPoint,
    /// Position relative to the grid viewport, before scroll
    pub local: PixelPoint,
    pub modifiers: Modifiers,
    pub time: Instant,
}

impl PointerEvent {
    pub fn new(button: PointerButton, client: PixelPoint, local: PixelPoint, time: Instant) -> Self {
        Self {
            button,
            client,
            local,
            modifiers: Modifiers::NONE,
            time,
        }
    }

    /// Event where the viewport sits at the window origin
    pub fn at(button: PointerButton, x: f64, y: f64, time: Instant) -> Self {
        let p = PixelPoint::new(x, y);
        Self::new(button, p, p, time)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Same button and origin, moved to a new position at a later time
    pub fn moved_by(&self, dx: f64, dy: f64, time: Instant) -> Self {
        let delta = PixelPoint::new(dx, dy);
        Self {
            client: self.client + delta,
            local: self.local + delta,
            time,
            ..*self
        }
    }
}
