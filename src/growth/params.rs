//! Growth parameters for axon trees

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::mesh::SurfaceMesh;

/// Parameters for one growth run (immutable while growing).
///
/// Angles are in degrees, lengths and radii in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParams {
    /// Number of root seeds per mesh
    pub axon_count: usize,
    /// Maximum tilt of the root direction away from the surface normal
    pub root_cone_angle_max: f32,
    /// Upper tube radius; each tree draws its own maximum from `[0.5, 1.0] *` this
    pub radius_max: f32,
    /// Lower bound of the tapered radius
    pub radius_min: f32,
    /// Chance that a step forks into two branches (0..1)
    pub split_probability: f32,
    /// Hard cap on recursion depth
    pub layer_count_max: u32,
    /// Longest advance per step
    pub segment_length_max: f32,
    /// Shortest advance per step
    pub segment_length_min: f32,
    /// Cumulative path length cap per branch
    pub total_length_max: f32,
    /// Per-step random tilt about each axis
    pub direction_jitter_max_angle: f32,
    /// Samples around each cross-section (>= 3)
    pub ring_segment_count: usize,
    /// Power-law falloff of the radius with path length
    pub radius_attenuation_exponent: f32,
    /// Power-law falloff of the point size with path length
    pub size_attenuation_exponent: f32,
    /// Scalar applied to point colors
    pub color_intensity: f32,
    /// Seed vertices are pulled towards the model origin by this factor
    pub root_inset_scale: f32,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            axon_count: 5,
            root_cone_angle_max: 10.0,
            radius_max: 0.12,
            radius_min: 0.001,
            split_probability: 0.015,
            layer_count_max: 80,
            segment_length_max: 0.04,
            segment_length_min: 0.03,
            total_length_max: 3.0,
            direction_jitter_max_angle: 5.0,
            ring_segment_count: 8,
            radius_attenuation_exponent: 4.0,
            size_attenuation_exponent: 2.0,
            color_intensity: 2.0,
            root_inset_scale: 0.9,
        }
    }
}

impl GrowthParams {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Load and validate a JSON parameter file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Write as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Reject parameter sets that would produce degenerate or NaN geometry.
    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("root_cone_angle_max", self.root_cone_angle_max),
            ("radius_max", self.radius_max),
            ("radius_min", self.radius_min),
            ("split_probability", self.split_probability),
            ("segment_length_max", self.segment_length_max),
            ("segment_length_min", self.segment_length_min),
            ("total_length_max", self.total_length_max),
            ("direction_jitter_max_angle", self.direction_jitter_max_angle),
            ("radius_attenuation_exponent", self.radius_attenuation_exponent),
            ("size_attenuation_exponent", self.size_attenuation_exponent),
            ("color_intensity", self.color_intensity),
            ("root_inset_scale", self.root_inset_scale),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(config_error(format!("{} must be finite, got {}", name, value)));
        }

        if self.axon_count == 0 {
            return Err(config_error("axon_count must be at least 1"));
        }
        if self.ring_segment_count < 3 {
            return Err(config_error(format!(
                "ring_segment_count must be at least 3, got {}",
                self.ring_segment_count
            )));
        }
        if self.layer_count_max < 2 {
            return Err(config_error(format!(
                "layer_count_max must be at least 2, got {}",
                self.layer_count_max
            )));
        }
        if self.radius_max <= 0.0 {
            return Err(config_error(format!("radius_max must be positive, got {}", self.radius_max)));
        }
        if self.radius_min < 0.0 {
            return Err(config_error(format!("radius_min must not be negative, got {}", self.radius_min)));
        }
        if self.segment_length_min <= 0.0 {
            return Err(config_error(format!(
                "segment_length_min must be positive, got {}",
                self.segment_length_min
            )));
        }
        if self.segment_length_max < self.segment_length_min {
            return Err(config_error(format!(
                "segment_length_max ({}) is below segment_length_min ({})",
                self.segment_length_max, self.segment_length_min
            )));
        }
        if self.total_length_max <= 0.0 {
            return Err(config_error(format!(
                "total_length_max must be positive, got {}",
                self.total_length_max
            )));
        }
        if !(0.0..=1.0).contains(&self.split_probability) {
            return Err(config_error(format!(
                "split_probability must be within [0, 1], got {}",
                self.split_probability
            )));
        }
        if self.root_cone_angle_max < 0.0 || self.direction_jitter_max_angle < 0.0 {
            return Err(config_error("angles must not be negative"));
        }
        if self.root_inset_scale <= 0.0 {
            return Err(config_error(format!(
                "root_inset_scale must be positive, got {}",
                self.root_inset_scale
            )));
        }
        Ok(())
    }

    /// Validate against a concrete mesh: every seeding range must be non-empty.
    pub fn validate_for_mesh(&self, mesh: &SurfaceMesh) -> Result<()> {
        self.validate()?;
        if self.axon_count > mesh.vertex_count() {
            return Err(config_error(format!(
                "axon_count ({}) exceeds the mesh vertex count ({})",
                self.axon_count,
                mesh.vertex_count()
            )));
        }
        Ok(())
    }

    /// Jitter limit doubled: the largest turn one step is expected to make.
    pub fn layer_angle_max(&self) -> f32 {
        self.direction_jitter_max_angle * 2.0
    }

    /// `((total_length_max - path_length) / total_length_max) ^ exponent`,
    /// with the base clamped to `[0, 1]`.
    pub fn length_falloff(&self, path_length: f32, exponent: f32) -> f32 {
        let remaining = ((self.total_length_max - path_length) / self.total_length_max).clamp(0.0, 1.0);
        remaining.powf(exponent)
    }
}

fn config_error(message: impl Into<String>) -> Error {
    Error::Config(message.into())
}
