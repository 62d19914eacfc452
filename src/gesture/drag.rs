//! One physical drag as a down/move/up stream
//!
//! [`DragObserver`] holds at most one active drag. Mouse-up takes the drag
//! state out of the observer, so the terminal action of a drag can run only
//! once no matter how many release events follow.

use crate::geometry::PixelPoint;
use crate::input::PointerEvent;

/// An active drag started by `start`
#[derive(Debug, Clone)]
pub struct Drag<G> {
    pub start: PointerEvent,
    pub last: PointerEvent,
    pub state: G,
}

impl<G> Drag<G> {
    /// Client-space offset from the press to `event`
    pub fn client_delta(&self, event: &PointerEvent) -> PixelPoint {
        event.client - self.start.client
    }
}

/// A move event delivered to the active drag
#[derive(Debug)]
pub struct DragMove<'a, G> {
    pub state: &'a mut G,
    pub start: PointerEvent,
    pub event: PointerEvent,
    pub client_delta: PixelPoint,
}

/// The release that ended a drag
#[derive(Debug, Clone)]
pub struct DragEnd<G> {
    pub state: G,
    pub start: PointerEvent,
    pub event: PointerEvent,
    pub client_delta: PixelPoint,
}

#[derive(Debug, Clone)]
pub struct DragObserver<G> {
    active: Option<Drag<G>>,
}

impl<G> Default for DragObserver<G> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<G> DragObserver<G> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Drag<G>> {
        self.active.as_ref()
    }

    pub fn state(&self) -> Option<&G> {
        self.active.as_ref().map(|d| &d.state)
    }

    /// Start a drag; returns the state of a drag that was never released
    pub fn begin(&mut self, event: PointerEvent, state: G) -> Option<G> {
        self.active
            .replace(Drag {
                start: event,
                last: event,
                state,
            })
            .map(|abandoned| abandoned.state)
    }

    /// Route a move to the active drag
    pub fn on_move(&mut self, event: PointerEvent) -> Option<DragMove<'_, G>> {
        let drag = self.active.as_mut()?;
        drag.last = event;
        let client_delta = event.client - drag.start.client;
        Some(DragMove {
            start: drag.start,
            event,
            client_delta,
            state: &mut drag.state,
        })
    }

    /// End the drag if `event` releases the button that started it
    pub fn on_up(&mut self, event: PointerEvent) -> Option<DragEnd<G>> {
        if self.active.as_ref()?.start.button != event.button {
            return None;
        }
        let drag = self.active.take()?;
        Some(DragEnd {
            client_delta: drag.client_delta(&event),
            state: drag.state,
            start: drag.start,
            event,
        })
    }

    /// Drop the active drag without a release
    pub fn cancel(&mut self) -> Option<G> {
        self.active.take().map(|d| d.state)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::input::PointerButton;

    #[test]
    fn test_move_reports_delta_from_start() {
        let t = Instant::now();
        let mut drags = DragObserver::new();
        let down = PointerEvent::at(PointerButton::Primary, 10.0, 20.0, t);
        drags.begin(down, 0u32);

        let mv = drags.on_move(down.moved_by(5.0, -3.0, t)).unwrap();
        *mv.state += 1;
        assert_eq!(mv.client_delta, PixelPoint::new(5.0, -3.0));

        let mv = drags.on_move(down.moved_by(8.0, 0.0, t)).unwrap();
        assert_eq!(mv.client_delta, PixelPoint::new(8.0, 0.0));
        assert_eq!(*mv.state, 1);
    }

    #[test]
    fn test_up_fires_once() {
        let t = Instant::now();
        let mut drags = DragObserver::new();
        let down = PointerEvent::at(PointerButton::Primary, 0.0, 0.0, t);
        drags.begin(down, "resize");
        assert!(drags.on_up(down).is_some());
        assert!(drags.on_up(down).is_none());
        assert!(drags.on_move(down).is_none());
        assert!(!drags.is_active());
    }

    #[test]
    fn test_other_button_release_is_ignored() {
        let t = Instant::now();
        let mut drags = DragObserver::new();
        drags.begin(PointerEvent::at(PointerButton::Auxiliary, 0.0, 0.0, t), ());
        assert!(drags
            .on_up(PointerEvent::at(PointerButton::Primary, 0.0, 0.0, t))
            .is_none());
        assert!(drags.is_active());
    }

    #[test]
    fn test_begin_returns_abandoned_state() {
        let t = Instant::now();
        let mut drags = DragObserver::new();
        let down = PointerEvent::at(PointerButton::Primary, 0.0, 0.0, t);
        assert_eq!(drags.begin(down, 1), None);
        assert_eq!(drags.begin(down, 2), Some(1));
        assert_eq!(drags.cancel(), Some(2));
        assert_eq!(drags.cancel(), None);
    }
}
