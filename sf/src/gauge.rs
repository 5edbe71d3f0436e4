//! Slider aggregator: averages the skill sliders into a gauge and a level label

use std::collections::BTreeMap;

use eyre::{Context, Result};
use keystore::Storage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Storage key for the raw slider values
pub const INDEX_KEY: &str = "skillsIndexData";

/// Largest slider value
pub const MAX_VALUE: u8 = 100;

/// Upper bounds (exclusive) and labels for every tier but the top one
const TIERS: &[(u8, &str)] = &[
    (25, "Just getting started..."),
    (50, "Making progress..."),
    (75, "Getting there..."),
];

/// Label for averages at or above the last tier bound
const TOP_TIER: &str = "Expert level — keep going!";

/// Rounded mean of the values; 0 when there are none
pub fn average(values: &[u8]) -> u8 {
    if values.is_empty() {
        return 0;
    }
    let sum: u32 = values.iter().map(|&v| u32::from(v)).sum();
    let mean = f64::from(sum) / values.len() as f64;
    mean.round().clamp(0.0, f64::from(MAX_VALUE)) as u8
}

/// Level label for an average
pub fn level_text(average: u8) -> &'static str {
    TIERS
        .iter()
        .find(|(bound, _)| average < *bound)
        .map(|(_, label)| *label)
        .unwrap_or(TOP_TIER)
}

/// A configured slider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderSpec {
    pub id: String,
    pub label: String,
    #[serde(default = "default_slider_value")]
    pub value: u8,
}

fn default_slider_value() -> u8 {
    50
}

impl SliderSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: u8) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.min(MAX_VALUE),
        }
    }
}

/// A slider and its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slider {
    pub id: String,
    pub label: String,
    pub value: u8,
}

impl Slider {
    /// Text for the slider's paired value display
    pub fn output(&self) -> String {
        format!("{}%", self.value)
    }
}

/// Everything the gauge displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeReadout {
    pub average: u8,
    /// CSS-style width of the fill, e.g. "25%"
    pub fill_width: String,
    pub level: &'static str,
}

impl GaugeReadout {
    pub fn for_values(values: &[u8]) -> Self {
        let average = average(values);
        Self {
            average,
            fill_width: format!("{}%", average),
            level: level_text(average),
        }
    }

    /// Fill as a fraction, 0.0..=1.0
    pub fn fill_ratio(&self) -> f64 {
        f64::from(self.average) / f64::from(MAX_VALUE)
    }
}

/// Parse a stored slider value given as a number or numeric string
fn parse_value(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number
        .is_finite()
        .then(|| number.round().clamp(0.0, f64::from(MAX_VALUE)) as u8)
}

/// The slider set and its aggregate
#[derive(Debug, Clone, Default)]
pub struct Gauge {
    sliders: Vec<Slider>,
    selected: usize,
}

impl Gauge {
    pub fn new(specs: &[SliderSpec]) -> Self {
        let sliders = specs
            .iter()
            .map(|spec| Slider {
                id: spec.id.clone(),
                label: spec.label.clone(),
                value: spec.value.min(MAX_VALUE),
            })
            .collect();
        Self { sliders, selected: 0 }
    }

    /// Build from specs, then overlay any stored values
    pub fn load(specs: &[SliderSpec], storage: &dyn Storage) -> Result<Self> {
        debug!(count = specs.len(), "Gauge::load: called");
        let mut gauge = Self::new(specs);
        if let Some(raw) = storage.get(INDEX_KEY).context("Failed to read stored slider values")? {
            gauge.apply_stored(&raw);
        }
        Ok(gauge)
    }

    fn apply_stored(&mut self, raw: &str) {
        let stored = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("Stored slider values are not an object, keeping defaults");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse stored slider values, keeping defaults");
                return;
            }
        };

        for slider in &mut self.sliders {
            if let Some(value) = stored.get(&slider.id).and_then(parse_value) {
                slider.value = value;
            }
        }
    }

    pub fn sliders(&self) -> &[Slider] {
        &self.sliders
    }

    pub fn values(&self) -> Vec<u8> {
        self.sliders.iter().map(|s| s.value).collect()
    }

    pub fn readout(&self) -> GaugeReadout {
        GaugeReadout::for_values(&self.values())
    }

    /// Set slider `id` and write all values through
    ///
    /// Returns None for an unknown id.
    pub fn set(&mut self, storage: &mut dyn Storage, id: &str, value: u8) -> Result<Option<GaugeReadout>> {
        let Some(index) = self.sliders.iter().position(|s| s.id == id) else {
            debug!(id, "Gauge::set: unknown slider");
            return Ok(None);
        };
        self.set_index(storage, index, value)
    }

    /// Set the slider at `index` and write all values through
    pub fn set_index(&mut self, storage: &mut dyn Storage, index: usize, value: u8) -> Result<Option<GaugeReadout>> {
        let Some(slider) = self.sliders.get_mut(index) else {
            return Ok(None);
        };
        let previous = std::mem::replace(&mut slider.value, value.min(MAX_VALUE));
        debug!(id = %slider.id, value = slider.value, "Gauge::set_index: updated");
        if let Err(e) = self.save(storage) {
            self.sliders[index].value = previous;
            return Err(e);
        }
        Ok(Some(self.readout()))
    }

    /// Nudge the selected slider by `delta`
    pub fn adjust_selected(&mut self, storage: &mut dyn Storage, delta: i16) -> Result<Option<GaugeReadout>> {
        let Some(slider) = self.sliders.get(self.selected) else {
            return Ok(None);
        };
        let value = (i16::from(slider.value) + delta).clamp(0, i16::from(MAX_VALUE)) as u8;
        self.set_index(storage, self.selected, value)
    }

    fn save(&self, storage: &mut dyn Storage) -> Result<()> {
        let values: BTreeMap<&str, String> = self
            .sliders
            .iter()
            .map(|s| (s.id.as_str(), s.value.to_string()))
            .collect();
        let raw = serde_json::to_string(&values)?;
        storage.set(INDEX_KEY, &raw).context("Failed to save slider values")?;
        Ok(())
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        if index < self.sliders.len() {
            self.selected = index;
        }
    }

    pub fn select_next(&mut self) {
        if !self.sliders.is_empty() {
            self.selected = (self.selected + 1) % self.sliders.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.sliders.is_empty() {
            self.selected = (self.selected + self.sliders.len() - 1) % self.sliders.len();
        }
    }
}
