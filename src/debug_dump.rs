//! Debug state dump for development diagnostics
//!
//! Serializes a snapshot of the grid state to JSON. The demo host writes
//! one on F7 in debug builds.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::geometry::Rect;
use crate::gesture::{GestureKind, MouseMode};
use crate::model::{GridModel, Size};
use crate::quantize::Quantizer;
use crate::selection::Selection;
use crate::store::{ContentItem, ContentStore};
use crate::view::PaintStats;

#[derive(Debug, Serialize)]
pub struct StateDump {
    /// Seconds since the unix epoch
    pub timestamp: u64,
    pub store_revision: u64,
    pub view: ViewDump,
    pub gesture: Option<GestureKind>,
    pub visible_items: Vec<ContentItem>,
    pub last_paint: Option<PaintStats>,
}

#[derive(Debug, Serialize)]
pub struct ViewDump {
    pub mode: MouseMode,
    pub viewport: Size,
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub pixels_per_tick: f64,
    pub visible_rect: Rect,
    pub quantizer: Quantizer,
    pub selection: Option<Selection>,
    pub selected_items: usize,
    pub auto_scroll: bool,
    pub cursor_tick: f64,
    pub is_playing: bool,
    pub track: usize,
    pub selected_track: Option<usize>,
}

impl StateDump {
    pub fn capture(model: &GridModel, store: &dyn ContentStore, last_paint: Option<PaintStats>) -> Self {
        let view = &model.view;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self {
            timestamp,
            store_revision: store.revision(),
            view: ViewDump {
                mode: view.mode,
                viewport: view.viewport(),
                scroll_left: view.scroll_left(),
                scroll_top: view.scroll_top(),
                pixels_per_tick: view.transform().pixels_per_tick(),
                visible_rect: view.visible_rect(),
                quantizer: view.quantizer,
                selection: view.selection.selection().copied(),
                selected_items: view.selected_items.len(),
                auto_scroll: view.auto_scroll,
                cursor_tick: view.cursor_tick,
                is_playing: view.is_playing,
                track: view.track.0,
                selected_track: view.selected_track.map(|t| t.0),
            },
            gesture: model.gestures.active_kind(),
            visible_items: store.query_items_in_window(view.track, view.visible_ticks(0.0)),
            last_paint,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    /// Write the dump under `dir`, returning the file path
    pub fn save_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}-grid-dump.json", self.timestamp));
        std::fs::write(&path, self.to_json())?;
        Ok(path)
    }
}
