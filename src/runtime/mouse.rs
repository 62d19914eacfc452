//! Pointer tracking for the winit host
//!
//! winit reports position and buttons as separate events. The tracker folds
//! them into the self-contained [`PointerEvent`]s the grid consumes.

use std::time::Instant;

use winit::event::MouseButton;
use winit::keyboard::ModifiersState;

use notegrid::geometry::PixelPoint;
use notegrid::input::{Modifiers, PointerButton, PointerEvent};

pub fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Middle => Some(PointerButton::Auxiliary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

pub fn modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

/// Latest pointer position, modifiers and held buttons
#[derive(Debug, Default)]
pub struct PointerTracker {
    position: PixelPoint,
    modifiers: Modifiers,
    /// Held buttons in press order
    held: Vec<PointerButton>,
}

impl PointerTracker {
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = PixelPoint::new(x, y);
    }

    pub fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = modifiers(state);
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn position(&self) -> PixelPoint {
        self.position
    }

    fn event(&self, button: PointerButton, now: Instant) -> PointerEvent {
        // The grid fills the window, so client and local coincide
        PointerEvent::new(button, self.position, self.position, now).with_modifiers(self.modifiers)
    }

    pub fn press(&mut self, button: PointerButton, now: Instant) -> PointerEvent {
        if !self.held.contains(&button) {
            self.held.push(button);
        }
        self.event(button, now)
    }

    /// `None` if the button was not seen going down
    pub fn release(&mut self, button: PointerButton, now: Instant) -> Option<PointerEvent> {
        let index = self.held.iter().position(|b| *b == button)?;
        self.held.remove(index);
        Some(self.event(button, now))
    }

    /// Move event attributed to the first held button; hover is not reported
    pub fn moved(&self, now: Instant) -> Option<PointerEvent> {
        self.held.first().map(|button| self.event(*button, now))
    }

    /// Forget held buttons, e.g. after focus loss
    pub fn clear(&mut self) {
        self.held.clear();
    }
}
