//! Surface-space geometry shared by layout, hit testing and drawing backends.
//!
//! All coordinates are surface pixels with the origin at the top-left corner
//! and `y` growing downwards.

use serde::{Deserialize, Serialize};

/// A point in surface pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the left edge.
    pub x: f32,
    /// Vertical offset from the top edge.
    pub y: f32,
}

impl Point {
    /// The surface origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate by `offset`.
    pub fn offset(self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }
}

/// Axis-aligned rectangle in surface pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Half-open containment test: `[x, x+width) × [y, y+height)`.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Pixel dimensions of the backing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Surface width in pixels.
    pub width: f32,
    /// Surface height in pixels.
    pub height: f32,
}

impl SurfaceSize {
    /// Create a surface size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The full-surface rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Normalized texture coordinate on the panel plane (0-1 range, `v` grows upwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceUv {
    /// Horizontal coordinate, 0 at the left edge.
    pub u: f32,
    /// Vertical coordinate, 0 at the bottom edge.
    pub v: f32,
}

impl SurfaceUv {
    /// Create a UV coordinate.
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }

    /// Map to surface pixels: `x = u * W`, `y = (1 - v) * H`.
    pub fn to_surface(self, size: SurfaceSize) -> Point {
        Point::new(self.u * size.width, (1.0 - self.v) * size.height)
    }
}
