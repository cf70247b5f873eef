//! Engine configuration.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{DEFAULT_SAVE_SLOT, PRIMORDIAL_COUNT};

/// Tie-break applied when several rules share one unordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// First rule on the pair whose result is still undiscovered.
    #[default]
    FirstUndiscovered,
    /// Only the first rule defined for the pair is ever considered.
    FirstDefined,
}

impl Resolution {
    pub const ALL: [Self; 2] = [Self::FirstUndiscovered, Self::FirstDefined];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstUndiscovered => "first-undiscovered",
            Self::FirstDefined => "first-defined",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resolution `{0}` (expected first-undiscovered or first-defined)")]
pub struct ParseResolutionError(String);

impl FromStr for Resolution {
    type Err = ParseResolutionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|resolution| resolution.as_str() == normalized)
            .ok_or_else(|| ParseResolutionError(raw.to_string()))
    }
}

/// Knobs the engine reads on every combine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "EngineConfig::default_save_slot")]
    pub save_slot: String,
    /// Auto-save only fires once more than this many elements are known.
    #[serde(default = "EngineConfig::default_autosave_min_elements")]
    pub autosave_min_elements: usize,
    #[serde(default)]
    pub resolution: Resolution,
}

impl EngineConfig {
    #[must_use]
    pub fn default_save_slot() -> String {
        DEFAULT_SAVE_SLOT.to_string()
    }

    #[must_use]
    pub const fn default_autosave_min_elements() -> usize {
        PRIMORDIAL_COUNT
    }

    /// Parse overrides from JSON; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    #[must_use]
    pub fn with_save_slot(mut self, slot: impl Into<String>) -> Self {
        self.save_slot = slot.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            save_slot: Self::default_save_slot(),
            autosave_min_elements: Self::default_autosave_min_elements(),
            resolution: Resolution::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.save_slot, "godCreatorSave");
        assert_eq!(config.autosave_min_elements, 4);
        assert_eq!(config.resolution, Resolution::FirstUndiscovered);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config = EngineConfig::from_json(r#"{"resolution":"first_defined"}"#).unwrap();
        assert_eq!(config.resolution, Resolution::FirstDefined);
        assert_eq!(config.save_slot, DEFAULT_SAVE_SLOT);
    }

    #[test]
    fn resolution_parses_cli_spellings() {
        assert_eq!(
            "first-defined".parse::<Resolution>().unwrap(),
            Resolution::FirstDefined
        );
        assert_eq!(
            "First_Undiscovered".parse::<Resolution>().unwrap(),
            Resolution::FirstUndiscovered
        );
        assert!("latest".parse::<Resolution>().is_err());
    }
}
