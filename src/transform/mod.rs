//! Coordinate transforms between musical space and pixel space
//!
//! A [`CoordTransform`] is built from a fixed set of parameters and never
//! mutated afterwards. Zooming or resizing a view builds a new instance, so
//! pixel values derived from an old transform stay consistent with that old
//! transform only.
//!
//! The horizontal axis is always linear in ticks. The vertical axis is one
//! of three projections, chosen per view:
//!
//! - [`ValueAxis::Control`]: continuous controller values, top = max value
//! - [`ValueAxis::Keys`]: discrete pitch rows, top = highest key
//! - [`ValueAxis::Tracks`]: discrete arrangement rows, top = first track

mod control;

pub use control::ControlMode;

use thiserror::Error;

use crate::geometry::{LogicalPoint, PixelPoint, Rect};
use crate::selection::Selection;
use crate::store::ContentItem;

/// Side length of the hit box drawn around a controller point
pub const CONTROL_POINT_SIZE: f64 = 6.0;

/// Raised when transform parameters would divide by zero or flip the mapping
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("pixels per tick must be a positive finite number, got {0}")]
    InvalidPixelsPerTick(f64),
    #[error("controller max value must be a positive finite number, got {0}")]
    InvalidMaxValue(f64),
    #[error("lane height {height} leaves no drawable area with line width {line_width}")]
    DegenerateHeight { height: f64, line_width: f64 },
    #[error("row height must be a positive finite number, got {0}")]
    InvalidRowHeight(f64),
    #[error("a row projection needs at least one row")]
    NoRows,
    #[error("viewport size {width}x{height} is not usable")]
    InvalidViewport { width: f64, height: f64 },
}

/// Vertical projection used by a view
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueAxis {
    /// Linear value-to-y mapping with `line_width` padding at both ends
    Control {
        max_value: f64,
        height: f64,
        line_width: f64,
    },
    /// One row per key, highest key at the top
    Keys {
        pixels_per_key: f64,
        number_of_keys: u32,
    },
    /// One row per track, first track at the top
    Tracks { track_height: f64, track_count: u32 },
}

impl ValueAxis {
    fn validate(&self) -> Result<(), TransformError> {
        match *self {
            ValueAxis::Control {
                max_value,
                height,
                line_width,
            } => {
                if !(max_value.is_finite() && max_value > 0.0) {
                    return Err(TransformError::InvalidMaxValue(max_value));
                }
                if !(height.is_finite() && line_width.is_finite()) || height - line_width * 2.0 <= 0.0
                {
                    return Err(TransformError::DegenerateHeight { height, line_width });
                }
                Ok(())
            }
            ValueAxis::Keys {
                pixels_per_key,
                number_of_keys,
            } => validate_rows(pixels_per_key, number_of_keys),
            ValueAxis::Tracks {
                track_height,
                track_count,
            } => validate_rows(track_height, track_count),
        }
    }
}

fn validate_rows(row_height: f64, rows: u32) -> Result<(), TransformError> {
    if !(row_height.is_finite() && row_height > 0.0) {
        return Err(TransformError::InvalidRowHeight(row_height));
    }
    if rows == 0 {
        return Err(TransformError::NoRows);
    }
    Ok(())
}

/// Pure mapping between (tick, value) and (x, y)
///
/// Pixel coordinates here are *content* coordinates: scroll offsets are
/// applied by the caller, never by the transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordTransform {
    pixels_per_tick: f64,
    axis: ValueAxis,
}

impl CoordTransform {
    /// Build a transform, rejecting degenerate parameters up front
    pub fn new(pixels_per_tick: f64, axis: ValueAxis) -> Result<Self, TransformError> {
        if !(pixels_per_tick.is_finite() && pixels_per_tick > 0.0) {
            return Err(TransformError::InvalidPixelsPerTick(pixels_per_tick));
        }
        axis.validate()?;
        Ok(Self {
            pixels_per_tick,
            axis,
        })
    }

    /// Controller lane transform
    pub fn control(
        pixels_per_tick: f64,
        max_value: f64,
        height: f64,
        line_width: f64,
    ) -> Result<Self, TransformError> {
        Self::new(
            pixels_per_tick,
            ValueAxis::Control {
                max_value,
                height,
                line_width,
            },
        )
    }

    /// Piano-roll transform
    pub fn keys(
        pixels_per_tick: f64,
        pixels_per_key: f64,
        number_of_keys: u32,
    ) -> Result<Self, TransformError> {
        Self::new(
            pixels_per_tick,
            ValueAxis::Keys {
                pixels_per_key,
                number_of_keys,
            },
        )
    }

    /// Arrangement transform
    pub fn tracks(
        pixels_per_tick: f64,
        track_height: f64,
        track_count: u32,
    ) -> Result<Self, TransformError> {
        Self::new(
            pixels_per_tick,
            ValueAxis::Tracks {
                track_height,
                track_count,
            },
        )
    }

    #[inline]
    pub fn pixels_per_tick(&self) -> f64 {
        self.pixels_per_tick
    }

    #[inline]
    pub fn axis(&self) -> &ValueAxis {
        &self.axis
    }

    /// Same vertical axis, different horizontal zoom
    pub fn with_pixels_per_tick(&self, pixels_per_tick: f64) -> Result<Self, TransformError> {
        Self::new(pixels_per_tick, self.axis)
    }

    // ------------------------------------------------------------------
    // Horizontal axis
    // ------------------------------------------------------------------

    #[inline]
    pub fn x(&self, tick: f64) -> f64 {
        tick * self.pixels_per_tick
    }

    /// Inverse of [`Self::x`], truncated toward the earlier tick so that any
    /// pixel inside a tick's span resolves to that tick
    #[inline]
    pub fn tick(&self, x: f64) -> f64 {
        snapped_floor(x / self.pixels_per_tick)
    }

    /// Unfloored tick position, used for deltas and window bounds
    #[inline]
    pub fn exact_tick(&self, x: f64) -> f64 {
        x / self.pixels_per_tick
    }

    // ------------------------------------------------------------------
    // Vertical axis
    // ------------------------------------------------------------------

    pub fn y(&self, value: f64) -> f64 {
        match self.axis {
            ValueAxis::Control {
                max_value,
                height,
                line_width,
            } => (1.0 - value / max_value) * (height - line_width * 2.0) + line_width,
            ValueAxis::Keys {
                pixels_per_key,
                number_of_keys,
            } => (max_row(number_of_keys) - value) * pixels_per_key,
            ValueAxis::Tracks { track_height, .. } => value * track_height,
        }
    }

    /// Inverse of [`Self::y`]
    ///
    /// Control lanes floor the reciprocal; key rows take the ceiling so a
    /// point anywhere inside a row resolves to that row's key; track rows
    /// floor to the row index.
    pub fn value(&self, y: f64) -> f64 {
        match self.axis {
            ValueAxis::Control {
                max_value,
                height,
                line_width,
            } => snapped_floor((1.0 - (y - line_width) / (height - line_width * 2.0)) * max_value),
            ValueAxis::Keys {
                pixels_per_key,
                number_of_keys,
            } => snapped_ceil(max_row(number_of_keys) - y / pixels_per_key),
            ValueAxis::Tracks { track_height, .. } => snapped_floor(y / track_height),
        }
    }

    /// Convert a vertical pixel delta into a logical value delta
    pub fn value_delta(&self, dy: f64) -> f64 {
        match self.axis {
            ValueAxis::Control {
                max_value,
                height,
                line_width,
            } => -(dy / (height - line_width * 2.0)) * max_value,
            ValueAxis::Keys { pixels_per_key, .. } => -(dy / pixels_per_key).round(),
            ValueAxis::Tracks { track_height, .. } => (dy / track_height).round(),
        }
    }

    /// Clamp a logical value into the axis' representable range
    pub fn clamp_value(&self, value: f64) -> f64 {
        match self.axis {
            ValueAxis::Control { max_value, .. } => value.clamp(0.0, max_value),
            ValueAxis::Keys { number_of_keys, .. } => value.clamp(0.0, max_row(number_of_keys)),
            ValueAxis::Tracks { track_count, .. } => value.clamp(0.0, max_row(track_count)),
        }
    }

    /// Height of one discrete row, or `None` for the continuous axis
    pub fn row_height(&self) -> Option<f64> {
        match self.axis {
            ValueAxis::Control { .. } => None,
            ValueAxis::Keys { pixels_per_key, .. } => Some(pixels_per_key),
            ValueAxis::Tracks { track_height, .. } => Some(track_height),
        }
    }

    /// Total content height in pixels
    pub fn content_height(&self) -> f64 {
        match self.axis {
            ValueAxis::Control { height, .. } => height,
            ValueAxis::Keys {
                pixels_per_key,
                number_of_keys,
            } => pixels_per_key * number_of_keys as f64,
            ValueAxis::Tracks {
                track_height,
                track_count,
            } => track_height * track_count as f64,
        }
    }

    // ------------------------------------------------------------------
    // Composite operations
    // ------------------------------------------------------------------

    /// Project a logical point to the nearest whole pixel
    pub fn to_position(&self, point: LogicalPoint) -> PixelPoint {
        PixelPoint::new(self.x(point.tick).round(), self.y(point.value).round())
    }

    /// Resolve a pixel to the logical cell containing it
    pub fn from_position(&self, position: PixelPoint) -> LogicalPoint {
        LogicalPoint::new(self.tick(position.x), self.value(position.y))
    }

    #[inline]
    pub fn project(&self, point: LogicalPoint) -> PixelPoint {
        self.to_position(point)
    }

    #[inline]
    pub fn unproject(&self, position: PixelPoint) -> LogicalPoint {
        self.from_position(position)
    }

    /// Pixel bounds of a selection
    ///
    /// Either stored order is accepted. A selection without a value range
    /// spans the full content height.
    pub fn selection_rect(&self, selection: &Selection) -> Rect {
        let (from_tick, to_tick) = selection.tick_range();
        let x = self.x(from_tick);
        let width = self.x(to_tick) - x;

        let (top, bottom) = match selection.value_range() {
            None => (0.0, self.content_height()),
            Some((low, high)) => match self.axis {
                ValueAxis::Control { .. } => (self.y(high), self.y(low)),
                ValueAxis::Keys { pixels_per_key, .. } => {
                    (self.y(high), self.y(low) + pixels_per_key)
                }
                ValueAxis::Tracks { track_height, .. } => {
                    (self.y(low), self.y(high) + track_height)
                }
            },
        };

        Rect::new(x, top, width, bottom - top)
    }

    /// Pixel bounding box of a content item, used for hit-testing and drawing
    pub fn item_rect(&self, item: &ContentItem) -> Rect {
        match self.axis {
            ValueAxis::Control { .. } => {
                let center = PixelPoint::new(self.x(item.tick), self.y(item.value));
                let half = CONTROL_POINT_SIZE / 2.0;
                Rect::new(
                    center.x - half,
                    center.y - half,
                    CONTROL_POINT_SIZE,
                    CONTROL_POINT_SIZE,
                )
            }
            ValueAxis::Keys { pixels_per_key, .. } => Rect::new(
                self.x(item.tick),
                self.y(item.value),
                self.x(item.duration),
                pixels_per_key,
            ),
            ValueAxis::Tracks { track_height, .. } => Rect::new(
                self.x(item.tick),
                self.y(item.value),
                self.x(item.duration),
                track_height,
            ),
        }
    }
}

/// Relative tolerance under which a quotient counts as a whole number
const SNAP_EPSILON: f64 = 1e-9;

/// Whole number `v` is meant to be, when float error put it just off one
#[inline]
fn nearest_whole(v: f64) -> Option<f64> {
    let whole = v.round();
    ((v - whole).abs() <= SNAP_EPSILON * whole.abs().max(1.0)).then_some(whole)
}

/// `floor`, except a value within float error of a whole number is that number
#[inline]
fn snapped_floor(v: f64) -> f64 {
    nearest_whole(v).unwrap_or_else(|| v.floor())
}

#[inline]
fn snapped_ceil(v: f64) -> f64 {
    nearest_whole(v).unwrap_or_else(|| v.ceil())
}

#[inline]
fn max_row(rows: u32) -> f64 {
    rows.saturating_sub(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ItemId;

    #[test]
    fn test_control_to_position() {
        let t = CoordTransform::control(1.0, 127.0, 256.0, 2.0).unwrap();
        let p = t.to_position(LogicalPoint::new(100.0, 64.0));
        let expected_y = ((1.0 - 64.0 / 127.0) * 252.0 + 2.0_f64).round();
        assert_eq!(p, PixelPoint::new(100.0, expected_y));
    }

    #[test]
    fn test_control_extremes() {
        let t = CoordTransform::control(1.0, 127.0, 256.0, 2.0).unwrap();
        assert_eq!(t.y(127.0), 2.0);
        assert_eq!(t.y(0.0), 254.0);
        assert_eq!(t.value(2.0), 127.0);
        assert_eq!(t.value(254.0), 0.0);
    }

    #[test]
    fn test_tick_inverse_floors() {
        let t = CoordTransform::keys(0.5, 10.0, 128).unwrap();
        // tick 10 covers x in [5, 5.5)
        assert_eq!(t.tick(5.0), 10.0);
        assert_eq!(t.tick(5.49), 10.0);
        assert_eq!(t.tick(5.5), 11.0);
    }

    #[test]
    fn test_tick_inverse_at_fractional_zoom() {
        // 43 * 0.1 / 0.1 is 42.999... in floating point
        for pixels_per_tick in [0.1, 0.3, 1.0 / 3.0, 0.7] {
            let t = CoordTransform::keys(pixels_per_tick, 12.0, 128).unwrap();
            for tick in 0..2000 {
                let tick = tick as f64;
                assert_eq!(t.tick(t.x(tick)), tick, "ppt {} tick {}", pixels_per_tick, tick);
            }
        }
    }

    #[test]
    fn test_tick_inverse_brackets_fractional_ticks() {
        for pixels_per_tick in [0.1, 0.3, 1.0 / 3.0, 2.0] {
            let t = CoordTransform::keys(pixels_per_tick, 12.0, 128).unwrap();
            for tick in [0.25, 42.5, 43.75, 479.9, 1919.5] {
                let resolved = t.tick(t.x(tick));
                assert!(resolved <= tick && tick < resolved + 1.0, "ppt {} tick {}", pixels_per_tick, tick);
            }
        }
    }

    #[test]
    fn test_row_inverse_at_fractional_heights() {
        let keys = CoordTransform::keys(0.1, 0.3, 128).unwrap();
        let tracks = CoordTransform::tracks(0.1, 0.3, 64).unwrap();
        for row in 0..64 {
            let row = row as f64;
            assert_eq!(keys.value(keys.y(row)), row, "key {}", row);
            assert_eq!(tracks.value(tracks.y(row)), row, "track {}", row);
        }
        let control = CoordTransform::control(0.1, 127.0, 256.0, 2.0).unwrap();
        for value in 0..=127 {
            let value = value as f64;
            assert_eq!(control.value(control.y(value)), value, "value {}", value);
        }
    }

    #[test]
    fn test_keys_row_inverse_ceils() {
        let t = CoordTransform::keys(1.0, 10.0, 128).unwrap();
        // key 127 is the top row [0, 10)
        assert_eq!(t.value(0.0), 127.0);
        assert_eq!(t.value(9.99), 127.0);
        assert_eq!(t.value(10.0), 126.0);
        // key 60 row starts at (127 - 60) * 10 = 670
        assert_eq!(t.y(60.0), 670.0);
        assert_eq!(t.value(670.0), 60.0);
        assert_eq!(t.value(679.0), 60.0);
    }

    #[test]
    fn test_tracks_row_inverse_floors() {
        let t = CoordTransform::tracks(1.0, 64.0, 8).unwrap();
        assert_eq!(t.value(0.0), 0.0);
        assert_eq!(t.value(63.9), 0.0);
        assert_eq!(t.value(64.0), 1.0);
    }

    #[test]
    fn test_degenerate_parameters_rejected() {
        assert_eq!(
            CoordTransform::control(1.0, 0.0, 256.0, 2.0),
            Err(TransformError::InvalidMaxValue(0.0))
        );
        assert!(matches!(
            CoordTransform::control(1.0, 127.0, 4.0, 2.0),
            Err(TransformError::DegenerateHeight { .. })
        ));
        assert!(matches!(
            CoordTransform::keys(0.0, 10.0, 128),
            Err(TransformError::InvalidPixelsPerTick(_))
        ));
        assert!(matches!(
            CoordTransform::keys(-1.0, 10.0, 128),
            Err(TransformError::InvalidPixelsPerTick(_))
        ));
        assert!(matches!(
            CoordTransform::keys(f64::NAN, 10.0, 128),
            Err(TransformError::InvalidPixelsPerTick(_))
        ));
        assert_eq!(
            CoordTransform::keys(1.0, 10.0, 0),
            Err(TransformError::NoRows)
        );
        assert!(matches!(
            CoordTransform::tracks(1.0, 0.0, 4),
            Err(TransformError::InvalidRowHeight(_))
        ));
    }

    #[test]
    fn test_selection_rect_without_values_is_full_height() {
        let t = CoordTransform::control(2.0, 127.0, 100.0, 1.0).unwrap();
        let sel = Selection::ticks(40.0, 10.0);
        assert_eq!(t.selection_rect(&sel), Rect::new(20.0, 0.0, 60.0, 100.0));
    }

    #[test]
    fn test_selection_rect_keys_covers_both_rows() {
        let t = CoordTransform::keys(1.0, 10.0, 128).unwrap();
        let sel = Selection::new(LogicalPoint::new(0.0, 60.0), LogicalPoint::new(100.0, 62.0));
        let rect = t.selection_rect(&sel);
        assert_eq!(rect.y, t.y(62.0));
        assert_eq!(rect.height, 30.0);
        assert_eq!(rect.width, 100.0);
    }

    #[test]
    fn test_item_rect_keys() {
        let t = CoordTransform::keys(0.5, 12.0, 128).unwrap();
        let item = ContentItem::note(ItemId(7), 480.0, 240.0, 64.0);
        assert_eq!(
            t.item_rect(&item),
            Rect::new(240.0, (127.0 - 64.0) * 12.0, 120.0, 12.0)
        );
    }

    #[test]
    fn test_value_delta_directions() {
        let keys = CoordTransform::keys(1.0, 10.0, 128).unwrap();
        assert_eq!(keys.value_delta(-20.0), 2.0);
        assert_eq!(keys.value_delta(14.0), -1.0);
        let tracks = CoordTransform::tracks(1.0, 50.0, 4).unwrap();
        assert_eq!(tracks.value_delta(100.0), 2.0);
    }
}
