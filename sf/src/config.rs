//! Skillfolio configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::fx::{GlowTuning, Parallax};
use crate::gauge::SliderSpec;
use crate::nav::VISIBILITY_THRESHOLD;

/// Main Skillfolio configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the store and logs
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Text shown on the hero and about screens
    pub profile: ProfileConfig,

    /// Pointer effects
    pub effects: EffectsConfig,

    /// Section navigation
    pub navigation: NavigationConfig,

    /// Sliders aggregated by the gauge
    pub sliders: Vec<SliderSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: None,
            profile: ProfileConfig::default(),
            effects: EffectsConfig::default(),
            navigation: NavigationConfig::default(),
            sliders: default_sliders(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skillfolio")
}

fn default_sliders() -> Vec<SliderSpec> {
    vec![
        SliderSpec::new("rust", "Rust", 50),
        SliderSpec::new("systems", "Systems", 50),
        SliderSpec::new("testing", "Testing", 50),
        SliderSpec::new("design", "Design", 50),
    ]
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: ./skillfolio.yml
        let local_config = PathBuf::from("skillfolio.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/skillfolio/skillfolio.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("skillfolio").join("skillfolio.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Path of the key/value store inside the data directory
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(keystore::STORE_FILE)
    }

    /// Directory for log files
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Profile text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Name shown on the hero screen
    pub name: String,

    /// One-line subtitle under the name
    pub tagline: String,

    /// Body of the about screen
    pub about: String,

    /// Label of the hero call-to-action
    #[serde(rename = "cta-label")]
    pub cta_label: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "Skillfolio".to_string(),
            tagline: "A living index of what I know and what I am learning".to_string(),
            about: "Move the mouse to light the page. Scroll or press 1-4 to jump between screens, \
                    add skills with 'a', and tune the sliders on the index screen to see where \
                    you stand."
                .to_string(),
            cta_label: "Explore skills".to_string(),
        }
    }
}

/// Pointer effect configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Disable the parallax effect
    #[serde(rename = "reduced-motion")]
    pub reduced_motion: bool,

    /// Time between animation frames in milliseconds
    #[serde(rename = "frame-interval-ms")]
    pub frame_interval_ms: u64,

    /// Device units per terminal column
    #[serde(rename = "cell-width")]
    pub cell_width: f64,

    /// Device units per terminal row
    #[serde(rename = "cell-height")]
    pub cell_height: f64,

    /// Glow easing constants
    pub glow: GlowTuning,

    /// Largest parallax offset in device units
    #[serde(rename = "max-shift")]
    pub max_shift: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            frame_interval_ms: 33, // ~30 FPS
            cell_width: 8.0,
            cell_height: 16.0,
            glow: GlowTuning::default(),
            max_shift: Parallax::MAX_SHIFT,
        }
    }
}

/// Section navigation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Visible fraction at which a section can become active
    pub threshold: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            threshold: VISIBILITY_THRESHOLD,
        }
    }
}
