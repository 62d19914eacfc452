//! Grid model - the complete state of one grid view
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod observer;
pub mod store;

pub use observer::{ChangeNotifier, SubscriptionId};
pub use store::GridStore;

use serde::Serialize;

use crate::beats::Measure;
use crate::config::GridConfig;
use crate::geometry::{PixelPoint, Rect};
use crate::gesture::{GestureEngine, MouseMode};
use crate::quantize::Quantizer;
use crate::selection::SelectionModel;
use crate::store::{ItemId, TickRange, TrackId};
use crate::transform::{ControlMode, CoordTransform, TransformError, ValueAxis};

/// Padding above and below the drawable part of a controller lane
pub const CONTROL_LINE_WIDTH: f64 = 1.0;

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// View-level state the gesture handlers read and write
///
/// Fields whose changes need validation (transform, scroll, viewport) are
/// private and go through setters that keep the previous value when the
/// new one is rejected.
#[derive(Debug, Clone)]
pub struct ViewState {
    transform: CoordTransform,
    scroll_left: f64,
    scroll_top: f64,
    viewport: Size,

    pub mode: MouseMode,
    pub quantizer: Quantizer,
    pub selection: SelectionModel,
    /// Items captured by the last completed selection
    pub selected_items: Vec<ItemId>,
    /// Follow the playback cursor while playing
    pub auto_scroll: bool,
    /// Playback position in ticks
    pub cursor_tick: f64,
    pub is_playing: bool,
    /// Track whose content this view shows
    pub track: TrackId,
    /// Arrangement row picked by the last selection press
    pub selected_track: Option<TrackId>,
    pub measures: Vec<Measure>,
}

impl ViewState {
    pub fn new(transform: CoordTransform, quantizer: Quantizer, viewport: Size) -> Self {
        let selection = match transform.axis() {
            ValueAxis::Control { .. } => SelectionModel::time_only(),
            _ => SelectionModel::new(),
        };
        Self {
            transform,
            scroll_left: 0.0,
            scroll_top: 0.0,
            viewport,
            mode: MouseMode::default(),
            quantizer,
            selection,
            selected_items: Vec::new(),
            auto_scroll: true,
            cursor_tick: 0.0,
            is_playing: false,
            track: TrackId::default(),
            selected_track: None,
            measures: vec![Measure::common_time()],
        }
    }

    /// Piano roll sized from the config
    pub fn piano_roll(config: &GridConfig, viewport: Size) -> Result<Self, TransformError> {
        let transform =
            CoordTransform::keys(config.pixels_per_tick, config.key_height, config.number_of_keys)?;
        Ok(Self::from_config(transform, config, viewport))
    }

    /// Controller lane filling the viewport height
    pub fn control_lane(
        config: &GridConfig,
        control: ControlMode,
        viewport: Size,
    ) -> Result<Self, TransformError> {
        let transform = CoordTransform::control(
            config.pixels_per_tick,
            control.max_value(),
            viewport.height,
            CONTROL_LINE_WIDTH,
        )?;
        Ok(Self::from_config(transform, config, viewport))
    }

    /// Arrangement rows, one per track
    pub fn arrangement(
        config: &GridConfig,
        track_height: f64,
        track_count: u32,
        viewport: Size,
    ) -> Result<Self, TransformError> {
        let transform = CoordTransform::tracks(config.pixels_per_tick, track_height, track_count)?;
        Ok(Self::from_config(transform, config, viewport))
    }

    fn from_config(transform: CoordTransform, config: &GridConfig, viewport: Size) -> Self {
        let mut view = Self::new(transform, config.quantizer(), viewport);
        view.auto_scroll = config.auto_scroll;
        view
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn transform(&self) -> &CoordTransform {
        &self.transform
    }

    #[inline]
    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    #[inline]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    #[inline]
    pub fn scroll(&self) -> PixelPoint {
        PixelPoint::new(self.scroll_left, self.scroll_top)
    }

    #[inline]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Largest vertical scroll that still fills the viewport
    pub fn max_scroll_top(&self) -> f64 {
        (self.transform.content_height() - self.viewport.height).max(0.0)
    }

    /// Viewport-local point to content coordinates
    #[inline]
    pub fn content_point(&self, local: PixelPoint) -> PixelPoint {
        local + self.scroll()
    }

    /// Visible area in content coordinates
    pub fn visible_rect(&self) -> Rect {
        Rect::new(
            self.scroll_left,
            self.scroll_top,
            self.viewport.width,
            self.viewport.height,
        )
    }

    /// Tick span of the viewport widened by `margin_px` on both sides
    pub fn visible_ticks(&self, margin_px: f64) -> TickRange {
        let start = self.transform.exact_tick(self.scroll_left - margin_px).max(0.0);
        let end = self
            .transform
            .exact_tick(self.scroll_left + self.viewport.width + margin_px);
        TickRange::new(start, end)
    }

    /// Pixel bounds of the current selection in content coordinates
    pub fn selection_rect(&self) -> Option<Rect> {
        self.selection
            .selection()
            .map(|sel| self.transform.selection_rect(sel))
    }

    /// Playback cursor x in content coordinates
    pub fn cursor_x(&self) -> f64 {
        self.transform.x(self.cursor_tick)
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Set both scroll offsets, clamped to the content
    pub fn set_scroll(&mut self, left: f64, top: f64) {
        if left.is_finite() {
            self.scroll_left = left.max(0.0);
        }
        if top.is_finite() {
            self.scroll_top = top.clamp(0.0, self.max_scroll_top());
        }
    }

    /// Manual scroll: moves the view and stops following the cursor
    pub fn scroll_manually(&mut self, left: f64, top: f64) {
        self.set_scroll(left, top);
        self.auto_scroll = false;
    }

    /// Change the horizontal zoom, keeping the tick at `anchor_x` (viewport
    /// px) under the same pixel
    ///
    /// On error the previous transform stays in place.
    pub fn set_zoom_at(&mut self, pixels_per_tick: f64, anchor_x: f64) -> Result<(), TransformError> {
        let next = self.transform.with_pixels_per_tick(pixels_per_tick)?;
        let anchor_tick = self.transform.exact_tick(self.scroll_left + anchor_x);
        self.transform = next;
        self.set_scroll(self.transform.x(anchor_tick) - anchor_x, self.scroll_top);
        Ok(())
    }

    pub fn set_zoom(&mut self, pixels_per_tick: f64) -> Result<(), TransformError> {
        self.set_zoom_at(pixels_per_tick, 0.0)
    }

    /// Resize the viewport; controller lanes rebuild their transform to the
    /// new height
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), TransformError> {
        let size = Size::new(width, height);
        if !size.is_valid() {
            return Err(TransformError::InvalidViewport { width, height });
        }
        if let ValueAxis::Control {
            max_value,
            line_width,
            ..
        } = *self.transform.axis()
        {
            self.transform = CoordTransform::control(
                self.transform.pixels_per_tick(),
                max_value,
                height,
                line_width,
            )?;
        }
        self.viewport = size;
        self.set_scroll(self.scroll_left, self.scroll_top);
        Ok(())
    }

    /// Switch tools; leaving selection mode drops the selection
    ///
    /// Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: MouseMode) -> bool {
        if self.mode == mode {
            return false;
        }
        if self.mode == MouseMode::Selection {
            self.clear_selection();
        }
        self.mode = mode;
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.selected_items.clear();
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected_items.contains(&id)
    }

    /// Page the view so the playback cursor stays visible
    ///
    /// Only acts while playing with auto-scroll on. Returns whether the
    /// view scrolled.
    pub fn follow_cursor(&mut self) -> bool {
        if !(self.is_playing && self.auto_scroll) || self.viewport.width <= 0.0 {
            return false;
        }
        let x = self.cursor_x();
        let left = self.scroll_left;
        if x >= left && x < left + self.viewport.width {
            return false;
        }
        self.set_scroll(x, self.scroll_top);
        true
    }
}

/// The complete grid model: view state plus the gesture engine driving it
#[derive(Debug)]
pub struct GridModel {
    pub view: ViewState,
    pub gestures: GestureEngine,
    pub config: GridConfig,
}

impl GridModel {
    /// Piano-roll model built from the config
    pub fn new(config: GridConfig, viewport: Size) -> Result<Self, TransformError> {
        let view = ViewState::piano_roll(&config, viewport)?;
        Ok(Self::with_view(view, config))
    }

    pub fn with_view(view: ViewState, config: GridConfig) -> Self {
        Self {
            gestures: GestureEngine::new(config.double_click_window()),
            view,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piano_roll() -> ViewState {
        ViewState::piano_roll(&GridConfig::default(), Size::new(800.0, 600.0)).unwrap()
    }

    #[test]
    fn test_scroll_clamped() {
        let mut view = piano_roll();
        view.set_scroll(-10.0, -5.0);
        assert_eq!(view.scroll(), PixelPoint::ZERO);

        // 128 keys * 12px = 1536px of content, 600px viewport
        view.set_scroll(100.0, 5000.0);
        assert_eq!(view.scroll_top(), 936.0);
        assert_eq!(view.scroll_left(), 100.0);
    }

    #[test]
    fn test_zoom_rejected_keeps_transform() {
        let mut view = piano_roll();
        let before = *view.transform();
        assert!(view.set_zoom(0.0).is_err());
        assert_eq!(*view.transform(), before);
    }

    #[test]
    fn test_zoom_keeps_anchor_tick() {
        let mut view = piano_roll();
        view.set_scroll(480.0, 0.0);
        // tick under x=100 is (480 + 100) / 0.1 = 5800
        view.set_zoom_at(0.2, 100.0).unwrap();
        let tick = view.transform().exact_tick(view.scroll_left() + 100.0);
        assert!((tick - 5800.0).abs() < 1e-6, "anchor moved to {}", tick);
    }

    #[test]
    fn test_control_lane_resize_rebuilds_transform() {
        let config = GridConfig::default();
        let mut view =
            ViewState::control_lane(&config, ControlMode::Velocity, Size::new(400.0, 100.0)).unwrap();
        assert!(view.selection.is_time_only());
        view.resize(400.0, 200.0).unwrap();
        assert_eq!(view.transform().content_height(), 200.0);

        let before = *view.transform();
        assert!(view.resize(400.0, 1.0).is_err());
        assert_eq!(*view.transform(), before);
        assert_eq!(view.viewport().height, 200.0);
    }

    #[test]
    fn test_leaving_selection_mode_clears() {
        let mut view = piano_roll();
        view.set_mode(MouseMode::Selection);
        view.selection
            .start_selection(crate::geometry::LogicalPoint::new(0.0, 60.0));
        view.selected_items.push(ItemId(1));
        assert!(view.set_mode(MouseMode::Pencil));
        assert!(view.selection.selection().is_none());
        assert!(view.selected_items.is_empty());
        assert!(!view.set_mode(MouseMode::Pencil));
    }

    #[test]
    fn test_follow_cursor_pages() {
        let mut view = piano_roll();
        view.is_playing = true;
        // 800px at 0.1 px/tick covers 8000 ticks
        view.cursor_tick = 7000.0;
        assert!(!view.follow_cursor());
        view.cursor_tick = 9000.0;
        assert!(view.follow_cursor());
        assert!((view.scroll_left() - 900.0).abs() < 1e-9);

        view.auto_scroll = false;
        view.cursor_tick = 20000.0;
        assert!(!view.follow_cursor());
    }

    #[test]
    fn test_visible_ticks_with_margin() {
        let mut view = piano_roll();
        view.set_scroll(100.0, 0.0);
        let range = view.visible_ticks(50.0);
        assert!((range.start - 500.0).abs() < 1e-6);
        assert!((range.end - 9500.0).abs() < 1e-6);
    }
}
