//! Frame abstraction for drawing primitives
//!
//! Provides a simple, safe API for pixel buffer operations instead of
//! direct buffer indexing scattered throughout rendering code.

use crate::geometry::Rect;

/// Blend a foreground color onto a background color using alpha compositing.
///
/// Both colors are in ARGB format (0xAARRGGBB). The alpha value from the
/// foreground color determines the blend ratio.
///
/// Returns the blended color with full opacity (alpha = 0xFF).
#[inline]
pub fn blend_colors(bg: u32, fg: u32, alpha: f32) -> u32 {
    let bg_r = ((bg >> 16) & 0xFF) as f32;
    let bg_g = ((bg >> 8) & 0xFF) as f32;
    let bg_b = (bg & 0xFF) as f32;

    let fg_r = ((fg >> 16) & 0xFF) as f32;
    let fg_g = ((fg >> 8) & 0xFF) as f32;
    let fg_b = (fg & 0xFF) as f32;

    let final_r = (bg_r * (1.0 - alpha) + fg_r * alpha) as u32;
    let final_g = (bg_g * (1.0 - alpha) + fg_g * alpha) as u32;
    let final_b = (bg_b * (1.0 - alpha) + fg_b * alpha) as u32;

    0xFF000000 | (final_r << 16) | (final_g << 8) | final_b
}

/// Clipping rectangle in pixel coordinates (inclusive start, exclusive end).
#[derive(Clone, Copy, Debug)]
struct ClipRect {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

/// A frame buffer wrapper providing safe drawing primitives.
///
/// All coordinates are in viewport pixels. Out-of-bounds operations are
/// safely clipped, including negative coordinates from scrolled content.
pub struct Frame<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
    clip: Option<ClipRect>,
}

impl<'a> Frame<'a> {
    /// Create a new frame from a mutable pixel buffer
    ///
    /// If the buffer is smaller than width*height, dimensions are adjusted
    /// to match the actual buffer size to prevent out-of-bounds access.
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        let expected_size = width * height;
        let actual_size = buffer.len();

        let (width, height) = if actual_size < expected_size && width > 0 {
            (width, actual_size / width)
        } else {
            (width, height)
        };

        Self {
            buffer,
            width,
            height,
            clip: None,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Set a clipping rectangle. All subsequent drawing operations will be
    /// constrained to this region.
    pub fn set_clip(&mut self, rect: Rect) {
        let x0 = to_px(rect.x).min(self.width);
        let y0 = to_px(rect.y).min(self.height);
        let x1 = to_px(rect.right()).min(self.width);
        let y1 = to_px(rect.bottom()).min(self.height);
        self.clip = Some(ClipRect { x0, y0, x1, y1 });
    }

    /// Remove the clipping rectangle, restoring full-frame drawing.
    pub fn clear_clip(&mut self) {
        self.clip = None;
    }

    /// Effective bounds (exclusive max), considering clip rect.
    #[inline]
    fn bounds(&self) -> ClipRect {
        self.clip.unwrap_or(ClipRect {
            x0: 0,
            y0: 0,
            x1: self.width,
            y1: self.height,
        })
    }

    /// Pixel span of `rect` after clipping, or `None` when nothing is left
    fn span(&self, rect: Rect) -> Option<ClipRect> {
        if !rect.is_valid() {
            return None;
        }
        let b = self.bounds();
        let x0 = to_px(rect.x).max(b.x0);
        let y0 = to_px(rect.y).max(b.y0);
        let x1 = to_px(rect.right()).min(b.x1);
        let y1 = to_px(rect.bottom()).min(b.y1);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(ClipRect { x0, y0, x1, y1 })
    }

    /// Clear the entire buffer with a solid color
    #[inline]
    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Fill a rectangle with a solid color (no alpha blending)
    ///
    /// Returns whether any pixel was written.
    pub fn fill_rect(&mut self, rect: Rect, color: u32) -> bool {
        let Some(s) = self.span(rect) else {
            return false;
        };
        for y in s.y0..s.y1 {
            let row_start = y * self.width;
            self.buffer[row_start + s.x0..row_start + s.x1].fill(color);
        }
        true
    }

    /// Fill a rectangle with alpha blending (color is ARGB format)
    pub fn fill_rect_blended(&mut self, rect: Rect, color: u32) -> bool {
        let alpha = ((color >> 24) & 0xFF) as f32 / 255.0;
        if alpha <= 0.0 {
            return false;
        }
        if alpha >= 1.0 {
            return self.fill_rect(rect, color | 0xFF000000);
        }
        let Some(s) = self.span(rect) else {
            return false;
        };
        for y in s.y0..s.y1 {
            let row_start = y * self.width;
            for x in s.x0..s.x1 {
                let idx = row_start + x;
                self.buffer[idx] = blend_colors(self.buffer[idx], color, alpha);
            }
        }
        true
    }

    /// Horizontal 1px line across the full clip width
    pub fn hline(&mut self, y: f64, color: u32) -> bool {
        let width = self.width as f64;
        self.fill_rect(Rect::new(0.0, y.floor(), width, 1.0), color)
    }

    /// Vertical 1px line across the full clip height
    pub fn vline(&mut self, x: f64, color: u32) -> bool {
        let height = self.height as f64;
        self.fill_rect(Rect::new(x.floor(), 0.0, 1.0, height), color)
    }

    /// Draw a 1px border inside `rect`
    pub fn stroke_rect(&mut self, rect: Rect, color: u32) {
        let r = Rect::new(rect.x.floor(), rect.y.floor(), rect.width.max(1.0), rect.height.max(1.0));
        // Top
        self.fill_rect(Rect::new(r.x, r.y, r.width, 1.0), color);
        // Bottom
        self.fill_rect(Rect::new(r.x, r.bottom() - 1.0, r.width, 1.0), color);
        // Left
        self.fill_rect(Rect::new(r.x, r.y, 1.0, r.height), color);
        // Right
        self.fill_rect(Rect::new(r.right() - 1.0, r.y, 1.0, r.height), color);
    }

    /// Fill with a blended color and draw an opaque 1px border
    pub fn draw_bordered_rect(&mut self, rect: Rect, fill_color: u32, border_color: u32) {
        self.fill_rect_blended(rect, fill_color);
        self.stroke_rect(rect, border_color | 0xFF000000);
    }

    /// Get a single pixel (bounds-checked, returns 0 if out of bounds)
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.buffer[y * self.width + x]
        } else {
            0
        }
    }
}

/// Truncate a coordinate to a pixel index, with negatives pinned to 0
#[inline]
fn to_px(v: f64) -> usize {
    if v.is_nan() || v <= 0.0 {
        0
    } else {
        v as usize
    }
}
