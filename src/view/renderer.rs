//! Layered software renderer
//!
//! Paints five layers bottom to top into a [`Frame`]. Each layer applies
//! only the scroll axes it moves with: key rows follow vertical scroll,
//! beat lines and the playback cursor follow horizontal scroll, content and
//! the selection follow both.

use std::collections::HashSet;

use serde::Serialize;

use crate::beats::{beats_in_range, BeatMark};
use crate::commands::Layer;
use crate::geometry::{PixelPoint, Rect};
use crate::model::{Size, ViewState};
use crate::store::{ContentItem, ContentStore, ItemId};
use crate::theme::GridTheme;
use crate::transform::{CoordTransform, ValueAxis};

use super::frame::Frame;

/// Pitch classes drawn as black keys
const BLACK_KEYS: [u32; 5] = [1, 3, 6, 8, 10];

pub fn is_black_key(key: u32) -> bool {
    BLACK_KEYS.contains(&(key % 12))
}

/// Everything one paint needs, derived from committed state
#[derive(Debug, Clone)]
pub struct FrameInput {
    pub transform: CoordTransform,
    pub viewport: Size,
    pub scroll: PixelPoint,
    pub beats: Vec<BeatMark>,
    /// Items overlapping the window plus the render margin
    pub items: Vec<ContentItem>,
    pub selected: HashSet<ItemId>,
    /// Selection bounds in content coordinates
    pub selection: Option<Rect>,
    pub cursor_x: f64,
}

impl FrameInput {
    /// Query the store for the visible window and cull to the margin
    pub fn derive(view: &ViewState, store: &dyn ContentStore, margin_px: f64) -> Self {
        let transform = *view.transform();
        let window = view.visible_rect().inflate(margin_px.max(0.0));

        let items = store
            .query_items_in_window(view.track, view.visible_ticks(margin_px.max(0.0)))
            .into_iter()
            .filter(|item| transform.item_rect(item).intersects(&window))
            .collect();

        let beats = beats_in_range(
            &view.measures,
            transform.pixels_per_tick(),
            view.quantizer.timebase(),
            transform.exact_tick(view.scroll_left()),
            view.viewport().width,
        );

        Self {
            transform,
            viewport: view.viewport(),
            scroll: view.scroll(),
            beats,
            items,
            selected: view.selected_items.iter().copied().collect(),
            selection: view.selection_rect(),
            cursor_x: view.cursor_x(),
        }
    }
}

/// What a paint drew, for tests and the debug dump
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaintStats {
    /// Layers in the order they were painted
    pub layers: Vec<u8>,
    pub rows: usize,
    pub beats: usize,
    pub items: usize,
    pub selected_items: usize,
    pub selection: bool,
    pub cursor: bool,
}

#[derive(Debug, Clone)]
pub struct LayeredRenderer {
    theme: GridTheme,
}

impl LayeredRenderer {
    pub fn new(theme: GridTheme) -> Self {
        Self { theme }
    }

    pub fn set_theme(&mut self, theme: GridTheme) {
        self.theme = theme;
    }

    pub fn theme(&self) -> &GridTheme {
        &self.theme
    }

    /// Paint every layer in z order
    pub fn paint(&self, frame: &mut Frame<'_>, input: &FrameInput) -> PaintStats {
        let mut stats = PaintStats::default();
        frame.clear(self.theme.background.to_argb_u32());

        for layer in Layer::ALL {
            stats.layers.push(layer.z());
            match layer {
                Layer::Grid => stats.rows = self.paint_grid(frame, input),
                Layer::Beats => stats.beats = self.paint_beats(frame, input),
                Layer::Content => {
                    let (drawn, selected) = self.paint_content(frame, input);
                    stats.items = drawn;
                    stats.selected_items = selected;
                }
                Layer::Selection => stats.selection = self.paint_selection(frame, input),
                Layer::Cursor => stats.cursor = self.paint_cursor(frame, input),
            }
        }

        #[cfg(feature = "damage-debug")]
        frame.stroke_rect(
            Rect::new(0.0, 0.0, frame.width() as f64, frame.height() as f64),
            0xFFFF00FF,
        );

        stats
    }

    /// Row backgrounds and separators, offset by vertical scroll only
    fn paint_grid(&self, frame: &mut Frame<'_>, input: &FrameInput) -> usize {
        let t = &input.transform;
        let Some(row_height) = t.row_height() else {
            // Controller lane: mark the top and bottom of the value range
            if let ValueAxis::Control { max_value, .. } = *t.axis() {
                let color = self.theme.row_line.to_argb_u32();
                frame.hline(t.y(max_value) - input.scroll.y, color);
                frame.hline(t.y(0.0) - input.scroll.y, color);
            }
            return 0;
        };

        let rows = (t.content_height() / row_height).round() as i64;
        let first = (input.scroll.y / row_height).floor().max(0.0) as i64;
        let last = (((input.scroll.y + input.viewport.height) / row_height).ceil() as i64).min(rows);

        let line = self.theme.row_line.to_argb_u32();
        let shade = self.theme.black_key_row.to_argb_u32();
        let mut drawn = 0;
        for row in first..last {
            let top = row as f64 * row_height - input.scroll.y;
            if let ValueAxis::Keys { number_of_keys, .. } = *t.axis() {
                let key = number_of_keys.saturating_sub(1).saturating_sub(row as u32);
                if is_black_key(key) {
                    frame.fill_rect(
                        Rect::new(0.0, top, input.viewport.width, row_height),
                        shade,
                    );
                }
            }
            frame.hline(top + row_height - 1.0, line);
            drawn += 1;
        }
        drawn
    }

    /// Beat and measure lines, offset by horizontal scroll only
    fn paint_beats(&self, frame: &mut Frame<'_>, input: &FrameInput) -> usize {
        let beat = self.theme.beat_line.to_argb_u32();
        let measure = self.theme.measure_line.to_argb_u32();
        input
            .beats
            .iter()
            .filter(|mark| {
                let color = if mark.is_measure_start() { measure } else { beat };
                frame.vline(mark.x - input.scroll.x, color)
            })
            .count()
    }

    /// Items, offset by both scroll axes
    fn paint_content(&self, frame: &mut Frame<'_>, input: &FrameInput) -> (usize, usize) {
        let fill = self.theme.note.to_argb_u32();
        let selected_fill = self.theme.selected_note.to_argb_u32();
        let border = self.theme.note_border.to_argb_u32();

        let mut drawn = 0;
        let mut selected = 0;
        for item in &input.items {
            let rect = input
                .transform
                .item_rect(item)
                .translate(-input.scroll.x, -input.scroll.y);
            let is_selected = input.selected.contains(&item.id);
            let color = if is_selected { selected_fill } else { fill };
            if frame.fill_rect(rect, color) {
                frame.stroke_rect(rect, border);
                drawn += 1;
                if is_selected {
                    selected += 1;
                }
            }
        }
        (drawn, selected)
    }

    fn paint_selection(&self, frame: &mut Frame<'_>, input: &FrameInput) -> bool {
        let Some(rect) = input.selection else {
            return false;
        };
        let rect = rect.translate(-input.scroll.x, -input.scroll.y);
        frame.draw_bordered_rect(
            rect,
            self.theme.selection_fill.to_argb_u32(),
            self.theme.selection_border.to_argb_u32(),
        );
        true
    }

    /// Playback cursor, offset by horizontal scroll only
    fn paint_cursor(&self, frame: &mut Frame<'_>, input: &FrameInput) -> bool {
        frame.vline(input.cursor_x - input.scroll.x, self.theme.cursor.to_argb_u32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_keys() {
        // C4 = 60 is white, C#4 = 61 is black
        assert!(!is_black_key(60));
        assert!(is_black_key(61));
        assert!(is_black_key(70));
        assert!(!is_black_key(71));
    }
}
