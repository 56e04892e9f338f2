//! Rectangles in absolute pixels and in surface-relative fractions.

use crate::render::backend::SurfaceSize;

/// Axis-aligned rectangle in absolute pixel coordinates.
///
/// The rectangle is half-open: it covers every pixel `(x, y)` with
/// `x0 <= x < x1` and `y0 <= y < y1`. A rectangle with `x1 <= x0` or
/// `y1 <= y0` is empty. Coordinates may lie outside a surface; the raster
/// collaborator clips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle covering a whole surface of the given size.
    pub fn from_size(size: SurfaceSize) -> Self {
        Self::new(0, 0, clamp_dim(size.width), clamp_dim(size.height))
    }

    pub fn width(&self) -> i32 {
        self.x1.saturating_sub(self.x0).max(0)
    }

    pub fn height(&self) -> i32 {
        self.y1.saturating_sub(self.y0).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Returns the overlap of both rectangles. The result may be empty.
    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        )
    }
}

/// Rectangle expressed as fractions (`0.0 ..= 1.0`) of a surface's width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FracRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl FracRect {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Converts to absolute pixels on a surface of the given size.
    /// Each `fraction * dimension` product is truncated toward zero.
    pub fn to_pixels(&self, size: SurfaceSize) -> Rect {
        let w = size.width as f64;
        let h = size.height as f64;
        Rect::new(
            (w * self.x1) as i32,
            (h * self.y1) as i32,
            (w * self.x2) as i32,
            (h * self.y2) as i32,
        )
    }
}

fn clamp_dim(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
