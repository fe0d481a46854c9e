use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_NUM_TICKS, Viewport};
use crate::error::{ScaleError, ScaleResult};

/// How registered series contribute to the value-axis domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesComposition {
    /// Each series feeds its own value extent; series draw over one another.
    #[default]
    Overlaid,
    /// Series stack bottom-up; the stacked total extent feeds the value axis.
    Stacked,
}

/// What to do when one series carries several records at the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateKeyPolicy {
    /// Keep the last record at each key and log the overwrite counts.
    #[default]
    Overwrite,
    /// Refuse the offending series at registration.
    Reject,
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load engine
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub composition: SeriesComposition,
    #[serde(default)]
    pub duplicate_key_policy: DuplicateKeyPolicy,
    /// Total value-domain padding, split half per side.
    #[serde(default = "default_value_padding_proportion")]
    pub value_padding_proportion: f64,
    /// Rounds the value domain outward to nice tick multiples.
    #[serde(default)]
    pub nice_value_domain: bool,
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
}

impl ChartEngineConfig {
    /// Creates a config with default composition and padding.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            composition: SeriesComposition::default(),
            duplicate_key_policy: DuplicateKeyPolicy::default(),
            value_padding_proportion: default_value_padding_proportion(),
            nice_value_domain: false,
            tick_count: default_tick_count(),
        }
    }

    #[must_use]
    pub fn with_composition(mut self, composition: SeriesComposition) -> Self {
        self.composition = composition;
        self
    }

    #[must_use]
    pub fn with_duplicate_key_policy(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_key_policy = policy;
        self
    }

    #[must_use]
    pub fn with_value_padding_proportion(mut self, proportion: f64) -> Self {
        self.value_padding_proportion = proportion;
        self
    }

    #[must_use]
    pub fn with_nice_value_domain(mut self, enabled: bool) -> Self {
        self.nice_value_domain = enabled;
        self
    }

    #[must_use]
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    pub(super) fn validate(self) -> ScaleResult<Self> {
        if !self.value_padding_proportion.is_finite() || self.value_padding_proportion < 0.0 {
            return Err(ScaleError::InvalidData(
                "value padding proportion must be finite and >= 0".to_owned(),
            ));
        }
        if self.tick_count == 0 {
            return Err(ScaleError::InvalidData(
                "tick count must be >= 1".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> ScaleResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ScaleError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ScaleResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ScaleError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_value_padding_proportion() -> f64 {
    0.1
}

fn default_tick_count() -> usize {
    DEFAULT_NUM_TICKS
}
