//! Runtime module - winit/platform integration
//!
//! - `app` - ApplicationHandler, window and surface management
//! - `mouse` - winit pointer events to [`notegrid::input::PointerEvent`]

pub mod app;
pub mod mouse;

pub use app::App;
