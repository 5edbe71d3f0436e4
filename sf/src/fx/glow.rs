//! Cursor glow: an eased spot that follows the pointer and brightens with speed

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::frame::{FrameState, ease};
use super::{Extent, Point};

/// Easing and response constants for the glow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowTuning {
    /// Fraction of the remaining distance covered per frame
    #[serde(rename = "position-factor")]
    pub position_factor: f64,

    /// Fraction of the remaining intensity covered per frame
    #[serde(rename = "intensity-factor")]
    pub intensity_factor: f64,

    /// Intensity per unit of pointer speed (units per millisecond)
    #[serde(rename = "speed-gain")]
    pub speed_gain: f64,

    /// Lower bound on the time between two moves, in milliseconds
    #[serde(rename = "min-elapsed-ms")]
    pub min_elapsed_ms: f64,

    /// Position error at or below which an axis is settled
    #[serde(rename = "settle-distance")]
    pub settle_distance: f64,

    /// Intensity at or below which the glow is dark
    #[serde(rename = "settle-intensity")]
    pub settle_intensity: f64,
}

impl GlowTuning {
    pub const POSITION_FACTOR: f64 = 0.2;
    pub const INTENSITY_FACTOR: f64 = 0.12;
    pub const SPEED_GAIN: f64 = 0.35;
    pub const MIN_ELAPSED_MS: f64 = 1.0;
    pub const SETTLE_DISTANCE: f64 = 0.1;
    pub const SETTLE_INTENSITY: f64 = 0.01;
}

impl Default for GlowTuning {
    fn default() -> Self {
        Self {
            position_factor: Self::POSITION_FACTOR,
            intensity_factor: Self::INTENSITY_FACTOR,
            speed_gain: Self::SPEED_GAIN,
            min_elapsed_ms: Self::MIN_ELAPSED_MS,
            settle_distance: Self::SETTLE_DISTANCE,
            settle_intensity: Self::SETTLE_INTENSITY,
        }
    }
}

/// Visual parameters published after every step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowStyle {
    pub x: f64,
    pub y: f64,
    /// 0.15 at rest, 0.75 at full intensity
    pub opacity: f64,
    /// 0.6 at rest, 1.3 at full intensity
    pub scale: f64,
}

impl GlowStyle {
    /// Style for a glow at `position` with `intensity` in 0.0..=1.0
    pub fn from_state(position: Point, intensity: f64) -> Self {
        Self {
            x: position.x,
            y: position.y,
            opacity: 0.15 + intensity * 0.6,
            scale: 0.6 + intensity * 0.7,
        }
    }
}

/// Pointer-trailing glow
///
/// Input updates targets immediately; output is produced one step per frame
/// while the glow is still moving or lit.
#[derive(Debug, Clone)]
pub struct CursorGlow {
    tuning: GlowTuning,
    position: Point,
    target: Point,
    intensity: f64,
    target_intensity: f64,
    last_pointer: Point,
    last_move_ms: f64,
    frame: FrameState,
}

impl CursorGlow {
    /// Create a dark glow resting at the center of the viewport
    pub fn new(viewport: Extent) -> Self {
        Self::with_tuning(viewport, GlowTuning::default())
    }

    pub fn with_tuning(viewport: Extent, tuning: GlowTuning) -> Self {
        debug!(?viewport, ?tuning, "CursorGlow::with_tuning: called");
        let center = if viewport.is_usable() { viewport.center() } else { Point::default() };
        Self {
            tuning,
            position: center,
            target: center,
            intensity: 0.0,
            target_intensity: 0.0,
            last_pointer: center,
            last_move_ms: 0.0,
            frame: FrameState::Idle,
        }
    }

    /// Feed a pointer move observed at `now_ms`
    ///
    /// Returns true if this move armed a new frame.
    pub fn on_pointer_move(&mut self, pointer: Point, now_ms: f64) -> bool {
        if !pointer.is_finite() || !now_ms.is_finite() {
            debug!(?pointer, now_ms, "CursorGlow::on_pointer_move: non-finite input, ignoring");
            return false;
        }

        let elapsed = (now_ms - self.last_move_ms).max(self.tuning.min_elapsed_ms);
        let speed = pointer.distance(self.last_pointer) / elapsed;

        self.target = pointer;
        self.target_intensity = (speed * self.tuning.speed_gain).min(1.0);
        self.last_pointer = pointer;
        self.last_move_ms = now_ms;
        trace!(?pointer, speed, target_intensity = self.target_intensity, "CursorGlow::on_pointer_move");

        self.frame.request()
    }

    /// Pointer left the window: fade out in place
    pub fn on_pointer_leave(&mut self) {
        debug!("CursorGlow::on_pointer_leave: called");
        self.target_intensity = 0.0;
    }

    /// Run the pending frame, if any
    pub fn on_frame(&mut self) -> Option<GlowStyle> {
        if !self.frame.take() {
            return None;
        }
        Some(self.step())
    }

    /// One easing step, re-arming the next frame until settled
    pub fn step(&mut self) -> GlowStyle {
        self.position.x = ease(self.position.x, self.target.x, self.tuning.position_factor);
        self.position.y = ease(self.position.y, self.target.y, self.tuning.position_factor);
        self.intensity = ease(self.intensity, self.target_intensity, self.tuning.intensity_factor);

        if self.is_settled() {
            trace!("CursorGlow::step: settled, going idle");
            self.frame.cancel();
        } else {
            self.frame.request();
        }

        self.style()
    }

    /// Position within `settle_distance` on both axes and intensity at or below `settle_intensity`
    pub fn is_settled(&self) -> bool {
        (self.target.x - self.position.x).abs() <= self.tuning.settle_distance
            && (self.target.y - self.position.y).abs() <= self.tuning.settle_distance
            && self.intensity <= self.tuning.settle_intensity
    }

    /// Current visual parameters
    pub fn style(&self) -> GlowStyle {
        GlowStyle::from_state(self.position, self.intensity)
    }

    pub fn is_scheduled(&self) -> bool {
        self.frame.is_scheduled()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn target_intensity(&self) -> f64 {
        self.target_intensity
    }

    /// Place the glow directly, bypassing input
    #[cfg(test)]
    fn set_state(&mut self, position: Point, target: Point, intensity: f64, target_intensity: f64) {
        self.position = position;
        self.target = target;
        self.intensity = intensity;
        self.target_intensity = target_intensity;
    }
}
