//! Parallax tilt: pointer position mapped to a pair of offsets, one update per frame

use tracing::{debug, trace};

use super::frame::FrameState;
use super::{Extent, Point};

/// Offsets published by the parallax effect
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Shift {
    pub x: f64,
    pub y: f64,
}

impl Shift {
    pub const ZERO: Shift = Shift { x: 0.0, y: 0.0 };
}

/// Map a pointer position to offsets in `[-max_shift, max_shift]`
///
/// Returns None for a degenerate viewport or non-finite pointer.
pub fn shift_for(pointer: Point, viewport: Extent, max_shift: f64) -> Option<Shift> {
    if !viewport.is_usable() || !pointer.is_finite() {
        return None;
    }
    let nx = (pointer.x / viewport.width - 0.5) * 2.0;
    let ny = (pointer.y / viewport.height - 0.5) * 2.0;
    let shift = Shift {
        x: nx * max_shift,
        y: ny * max_shift,
    };
    (shift.x.is_finite() && shift.y.is_finite()).then_some(shift)
}

/// Frame-coalesced parallax
///
/// Moves land in a single slot; only the latest one is applied when the
/// frame runs. No smoothing carries over between frames.
#[derive(Debug, Clone)]
pub struct Parallax {
    max_shift: f64,
    queued: Option<Point>,
    frame: FrameState,
    shift: Shift,
}

impl Default for Parallax {
    fn default() -> Self {
        Self::new(Self::MAX_SHIFT)
    }
}

impl Parallax {
    /// Largest offset on either axis
    pub const MAX_SHIFT: f64 = 8.0;

    pub fn new(max_shift: f64) -> Self {
        debug!(max_shift, "Parallax::new: called");
        Self {
            max_shift,
            queued: None,
            frame: FrameState::Idle,
            shift: Shift::ZERO,
        }
    }

    /// Queue a pointer move
    ///
    /// Returns true if this move armed a new frame.
    pub fn on_pointer_move(&mut self, pointer: Point) -> bool {
        self.queued = Some(pointer);
        self.frame.request()
    }

    /// Run the pending frame against the current viewport
    ///
    /// Returns the newly published shift, or None when no frame was pending or
    /// the update had to be skipped.
    pub fn on_frame(&mut self, viewport: Extent) -> Option<Shift> {
        if !self.frame.take() {
            return None;
        }
        let pointer = self.queued.take()?;
        match shift_for(pointer, viewport, self.max_shift) {
            Some(shift) => {
                trace!(?pointer, ?shift, "Parallax::on_frame: published");
                self.shift = shift;
                Some(shift)
            }
            None => {
                debug!(?pointer, ?viewport, "Parallax::on_frame: degenerate geometry, skipping");
                None
            }
        }
    }

    /// Pointer left the window: reset immediately
    pub fn on_pointer_leave(&mut self) -> Shift {
        debug!("Parallax::on_pointer_leave: called");
        self.queued = None;
        self.frame.cancel();
        self.shift = Shift::ZERO;
        self.shift
    }

    /// Last published offsets
    pub fn shift(&self) -> Shift {
        self.shift
    }

    pub fn is_scheduled(&self) -> bool {
        self.frame.is_scheduled()
    }

    pub fn max_shift(&self) -> f64 {
        self.max_shift
    }
}
