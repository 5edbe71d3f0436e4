//! Frame scheduling state shared by the effects

use tracing::trace;

/// Whether an effect has a frame pending
///
/// `Idle -> Scheduled` on new input, `Scheduled -> Idle` when the frame runs.
/// An effect that still has work after its frame requests the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    #[default]
    Idle,
    Scheduled,
}

impl FrameState {
    /// Request a frame
    ///
    /// Returns true if this call armed a new frame, false if one was already pending.
    pub fn request(&mut self) -> bool {
        match self {
            Self::Idle => {
                trace!("FrameState::request: Idle -> Scheduled");
                *self = Self::Scheduled;
                true
            }
            Self::Scheduled => false,
        }
    }

    /// Consume the pending frame
    ///
    /// Returns true if a frame was pending. The state is Idle afterwards.
    pub fn take(&mut self) -> bool {
        let was_scheduled = self.is_scheduled();
        *self = Self::Idle;
        was_scheduled
    }

    /// Drop any pending frame
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled)
    }
}

/// One step of exponential smoothing: `current + (target - current) * factor`
pub fn ease(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}
