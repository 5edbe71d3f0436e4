//! Eased scrolling of the page viewport

use tracing::{debug, trace};

use crate::fx::{FrameState, ease};

/// Scroll offset that can jump or glide toward a target
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    offset: f64,
    target: f64,
    max: f64,
    frame: FrameState,
}

impl SmoothScroll {
    /// Fraction of the remaining distance covered per frame
    pub const FACTOR: f64 = 0.2;
    /// Distance, in rows, at which a glide snaps onto its target
    pub const SNAP: f64 = 0.5;

    pub fn new(max: f64) -> Self {
        Self {
            offset: 0.0,
            target: 0.0,
            max: max.max(0.0),
            frame: FrameState::Idle,
        }
    }

    /// Current offset in rows
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Current offset rounded to a whole row
    pub fn row(&self) -> u16 {
        self.offset.round().clamp(0.0, f64::from(u16::MAX)) as u16
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_gliding(&self) -> bool {
        self.frame.is_scheduled()
    }

    /// Update the scroll range, clamping the current position
    pub fn set_max(&mut self, max: f64) {
        self.max = max.max(0.0);
        self.offset = self.clamp(self.offset);
        self.target = self.clamp(self.target);
    }

    /// Glide to `target`
    pub fn scroll_to(&mut self, target: f64) {
        self.target = self.clamp(target);
        debug!(from = self.offset, to = self.target, "SmoothScroll::scroll_to: called");
        if (self.target - self.offset).abs() > f64::EPSILON {
            self.frame.request();
        }
    }

    /// Jump by `delta` rows, cancelling any glide
    pub fn scroll_by(&mut self, delta: f64) {
        self.jump_to(self.offset + delta);
    }

    /// Jump to `offset`, cancelling any glide
    pub fn jump_to(&mut self, offset: f64) {
        self.offset = self.clamp(offset);
        self.target = self.offset;
        self.frame.cancel();
    }

    /// Advance a pending glide by one frame
    ///
    /// Returns true if the offset moved.
    pub fn on_frame(&mut self) -> bool {
        if !self.frame.take() {
            return false;
        }
        let before = self.offset;
        self.offset = ease(self.offset, self.target, Self::FACTOR);
        if (self.target - self.offset).abs() < Self::SNAP {
            self.offset = self.target;
        } else {
            self.frame.request();
        }
        trace!(offset = self.offset, target = self.target, "SmoothScroll::on_frame");
        self.offset != before
    }

    fn clamp(&self, value: f64) -> f64 {
        if value.is_finite() { value.clamp(0.0, self.max) } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glide_reaches_target() {
        let mut scroll = SmoothScroll::new(100.0);
        scroll.scroll_to(40.0);
        assert!(scroll.is_gliding());

        assert!(scroll.on_frame());
        assert_eq!(scroll.offset(), 8.0);

        let mut frames = 1;
        while scroll.on_frame() {
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(scroll.offset(), 40.0);
        assert_eq!(scroll.row(), 40);
        assert!(!scroll.is_gliding());
    }

    #[test]
    fn test_targets_are_clamped() {
        let mut scroll = SmoothScroll::new(30.0);
        scroll.scroll_to(1000.0);
        while scroll.on_frame() {}
        assert_eq!(scroll.offset(), 30.0);

        scroll.scroll_by(-500.0);
        assert_eq!(scroll.offset(), 0.0);
        scroll.jump_to(f64::NAN);
        assert_eq!(scroll.offset(), 0.0);
    }

    #[test]
    fn test_jump_cancels_glide() {
        let mut scroll = SmoothScroll::new(100.0);
        scroll.scroll_to(50.0);
        scroll.scroll_by(3.0);
        assert!(!scroll.is_gliding());
        assert_eq!(scroll.offset(), 3.0);
        assert!(!scroll.on_frame());
    }

    #[test]
    fn test_shrinking_range_clamps() {
        let mut scroll = SmoothScroll::new(100.0);
        scroll.jump_to(90.0);
        scroll.set_max(60.0);
        assert_eq!(scroll.offset(), 60.0);
    }

    #[test]
    fn test_scroll_to_current_position_does_not_glide() {
        let mut scroll = SmoothScroll::new(100.0);
        scroll.scroll_to(0.0);
        assert!(!scroll.is_gliding());
    }
}
