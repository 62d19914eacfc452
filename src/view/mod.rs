//! Rendering: software frame, layered renderer and frame scheduling

pub mod frame;
pub mod renderer;
pub mod scheduler;

pub use frame::Frame;
pub use renderer::{FrameInput, LayeredRenderer, PaintStats};
pub use scheduler::{FrameKey, PendingFrame, RenderScheduler};
