//! Point and rectangle primitives for the two coordinate spaces
//!
//! `LogicalPoint` lives in musical space (tick, value) and `PixelPoint` in
//! screen space. Both are plain `Copy` values; converting between them is
//! the job of [`crate::transform::CoordTransform`].

use std::ops::{Add, Sub};

use serde::Serialize;

/// A point in musical space: time in ticks and a secondary axis value
/// (pitch, track index or controller value depending on the view)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LogicalPoint {
    pub tick: f64,
    pub value: f64,
}

impl LogicalPoint {
    pub const ZERO: Self = Self {
        tick: 0.0,
        value: 0.0,
    };

    pub const fn new(tick: f64, value: f64) -> Self {
        Self { tick, value }
    }

    /// True when both components are finite numbers
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.tick.is_finite() && self.value.is_finite()
    }
}

impl Add for LogicalPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.tick + rhs.tick, self.value + rhs.value)
    }
}

impl Sub for LogicalPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.tick - rhs.tick, self.value - rhs.value)
    }
}

/// A point in pixel space (content or client coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for PixelPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PixelPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build the rectangle spanning two corners given in any order
    pub fn from_corners(a: PixelPoint, b: PixelPoint) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Half-open containment: the left/top edges are inside, the
    /// right/bottom edges are not.
    #[inline]
    pub fn contains_point(&self, point: PixelPoint) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether the two rectangles share any area
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow the rectangle by `margin` on every side
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Move the rectangle by the given offset
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Finite position and non-negative size
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}
