//! Pointer-driven visual effects
//!
//! Two independent effects share the same frame discipline: at most one frame
//! is pending per effect, and an effect goes idle once it has nothing left to
//! animate.
//!
//! - [`CursorGlow`] trails the pointer, eases its position every frame and
//!   brightens with pointer speed.
//! - [`Parallax`] turns the latest pointer position into a pair of offsets,
//!   coalescing input to one update per frame.

mod frame;
mod glow;
mod parallax;

pub use frame::{FrameState, ease};
pub use glow::{CursorGlow, GlowStyle, GlowTuning};
pub use parallax::{Parallax, Shift, shift_for};

/// A position in device units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height of a viewport in device units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center of the viewport
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Non-zero, finite dimensions
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
