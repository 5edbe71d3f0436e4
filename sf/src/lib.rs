//! Skillfolio - a terminal skills portfolio
//!
//! A single scrolling page of full-height screens rendered with ratatui. The
//! pointer lights a trailing glow and tilts the hero backdrop, indicator dots
//! follow whichever screen is in view, skills are kept as expandable cards,
//! and a set of sliders is averaged into a gauge with a level label.
//!
//! Skills and slider values persist across runs through a `keystore`
//! key/value store.
//!
//! # Modules
//!
//! - [`fx`] - Cursor glow and parallax engines
//! - [`nav`] - Viewport observer, section navigator and smooth scroll
//! - [`skills`] - Skill list with write-through persistence
//! - [`cards`] - Expandable cards rendered from the skill list
//! - [`gauge`] - Slider aggregate and level tiers
//! - [`page`] - Section geometry
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//! - [`tui`] - Terminal front-end

pub mod cards;
pub mod cli;
pub mod config;
pub mod fx;
pub mod gauge;
pub mod nav;
pub mod page;
pub mod skills;
pub mod tui;

// Re-export commonly used types
pub use cards::{Card, CardDeck};
pub use config::{Config, EffectsConfig, NavigationConfig, ProfileConfig};
pub use fx::{CursorGlow, Extent, GlowStyle, Parallax, Point, Shift};
pub use gauge::{Gauge, GaugeReadout, Slider, SliderSpec};
pub use nav::{SectionNavigator, SmoothScroll, ViewportObserver};
pub use page::PageLayout;
pub use skills::{AddOutcome, Skill, SkillsStore};
