//! notegrid - Elm-style piano-roll grid engine
//!
//! This crate provides the coordinate transforms, selection model, pointer
//! gesture state machines and layered renderer behind a MIDI editor's note
//! grid, controller lanes and arrangement view. Content and playback live
//! behind the [`store::ContentStore`] and [`transport::Transport`] seams.

pub mod beats;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod debug_dump;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod messages;
pub mod model;
pub mod quantize;
pub mod selection;
pub mod store;
pub mod theme;
pub mod tracing;
pub mod transform;
pub mod transport;
pub mod update;
pub mod view;

// Re-export commonly used types
pub use commands::{Cmd, Damage, Layer};
pub use config::GridConfig;
pub use error::GridError;
pub use messages::Msg;
pub use model::store::GridStore;
pub use model::GridModel;
pub use theme::Theme;
pub use transform::CoordTransform;
