//! Light rig settings

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// How far ahead a walker commits its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookahead {
    /// Pick a random child each time an edge is completed
    #[default]
    Single,
    /// Also pick the child after next, so renderers can see one edge ahead
    Double,
}

/// Settings shared by every light walker on one forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Edges per second before the per-light random factor in `[0.5, 1.5)`
    pub base_progress_rate: f32,
    /// Fade change per second
    pub fade_rate: f32,
    /// Point light intensity at full fade
    pub light_intensity: f32,
    /// Glow sprite intensity at full fade
    pub glow_intensity: f32,
    pub lookahead: Lookahead,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            base_progress_rate: 10.0,
            fade_rate: 1.0,
            light_intensity: 2.0,
            glow_intensity: 10.0,
            lookahead: Lookahead::Single,
        }
    }
}

impl LightConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Rates must be positive, intensities non-negative.
    pub fn validate(&self) -> Result<()> {
        let rates = [("base_progress_rate", self.base_progress_rate), ("fade_rate", self.fade_rate)];
        for (name, value) in rates {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!("{} must be positive, got {}", name, value)));
            }
        }
        let intensities = [("light_intensity", self.light_intensity), ("glow_intensity", self.glow_intensity)];
        for (name, value) in intensities {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!("{} must not be negative, got {}", name, value)));
            }
        }
        Ok(())
    }
}
