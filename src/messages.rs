//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::beats::Measure;
use crate::gesture::MouseMode;
use crate::input::PointerEvent;
use crate::store::TrackId;

/// Raw pointer input from the host
#[derive(Debug, Clone, Copy)]
pub enum PointerMsg {
    Down(PointerEvent),
    Move(PointerEvent),
    Up(PointerEvent),
    /// Native context-menu request; the right-button press already handled it
    ContextMenu(PointerEvent),
}

/// View configuration and scrolling
#[derive(Debug, Clone)]
pub enum ViewMsg {
    /// Switch tools; cancels any active drag
    SetMouseMode(MouseMode),
    /// Scroll to absolute content offsets (manual scroll, clears auto-follow)
    ScrollTo { left: f64, top: f64 },
    /// Scroll by a pixel delta (wheel), clears auto-follow
    ScrollBy { dx: f64, dy: f64 },
    /// Viewport size in pixels
    Resize { width: f64, height: f64 },
    /// Horizontal zoom in pixels per tick
    SetZoom(f64),
    /// Zoom by a factor, keeping the tick under `anchor_x` (viewport px) fixed
    ZoomAt { factor: f64, anchor_x: f64 },
    SetQuantizeDenominator(u32),
    SetQuantizeEnabled(bool),
    SetAutoScroll(bool),
    ResetSelection,
    SetTrack(TrackId),
    SetMeasures(Vec<Measure>),
}

/// Notifications from the transport
#[derive(Debug, Clone, Copy)]
pub enum TransportMsg {
    PositionChanged(f64),
    PlayStateChanged(bool),
}

/// Notifications from the content store
#[derive(Debug, Clone, Copy)]
pub enum ContentMsg {
    /// Content changed outside the grid (undo, another view)
    Changed,
}

#[derive(Debug, Clone, Copy)]
pub enum GestureMsg {
    /// Drop the active drag without its terminal action (unmount, focus loss)
    Cancel,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Pointer(PointerMsg),
    View(ViewMsg),
    Transport(TransportMsg),
    Content(ContentMsg),
    Gesture(GestureMsg),
}
