//! Section navigation
//!
//! The observer turns viewport geometry into batches of visibility entries;
//! the navigator consumes those batches and keeps exactly one indicator
//! active. Neither knows how the other is implemented.

mod navigator;
mod observer;
mod scroll;

pub use navigator::{ActiveChange, Indicator, IndicatorMarker, ScrollRequest, SectionNavigator};
pub use observer::{Band, VisibilityBatch, VisibilityEntry, ViewportObserver, intersection_ratio};
pub use scroll::SmoothScroll;

/// Fraction of a section that must be visible before it can become active
pub const VISIBILITY_THRESHOLD: f64 = 0.6;
