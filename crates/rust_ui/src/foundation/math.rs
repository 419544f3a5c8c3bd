//! Math utilities and types
//!
//! 2D vectors, RGBA colors and axis-aligned rectangles in UI space.
//! UI space has its origin at the top-left corner with Y growing downwards.

pub use nalgebra::{Vector2, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 4D vector type, used for RGBA colors
pub type Vec4 = Vector4<f32>;

/// Layout axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis (widths)
    Horizontal,
    /// Y axis (heights)
    Vertical,
}

impl Axis {
    /// Index into a [`Vec2`] for this axis
    pub const fn index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
        }
    }

    /// The perpendicular axis
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

/// Axis-aligned rectangle (top-left origin plus size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub origin: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Default for Rect {
    fn default() -> Self {
        Self::zero()
    }
}

impl Rect {
    /// Empty rectangle at the origin
    pub fn zero() -> Self {
        Self::from_origin_size(Vec2::zeros(), Vec2::zeros())
    }

    /// Create a rectangle from its components
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Create a rectangle from origin and size vectors
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Left edge
    pub fn x(&self) -> f32 {
        self.origin.x
    }

    /// Top edge
    pub fn y(&self) -> f32 {
        self.origin.y
    }

    /// Width
    pub fn width(&self) -> f32 {
        self.size.x
    }

    /// Height
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Bottom-right corner
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Check if a point is inside the rectangle (edges included)
    pub fn contains_point(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.x <= max.x &&
        point.y >= self.origin.y && point.y <= max.y
    }

    /// Move the rectangle by an offset
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            origin: self.origin + offset,
            size: self.size,
        }
    }
}

/// Color constants
pub mod colors {
    use super::Vec4;

    /// Opaque white
    pub fn white() -> Vec4 {
        Vec4::new(1.0, 1.0, 1.0, 1.0)
    }

    /// Opaque black
    pub fn black() -> Vec4 {
        Vec4::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Fully transparent
    pub fn transparent() -> Vec4 {
        Vec4::zeros()
    }
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}
