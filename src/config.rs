//! Evaluation settings for orientation sampling.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::Vector3;

/// Relative parameter offset between the two finite-difference samples.
pub const DEFAULT_FRACTIONAL_SHIFT: f64 = 0.01;

/// What to do when `u + shift` lands past the end of the knot domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overshoot {
    /// Evaluate the last span's polynomial beyond the domain end.
    #[default]
    Extrapolate,
    /// Clamp the shifted sample to the domain end.
    Clamp,
}

/// Settings for [`crate::nurbs::NurbsCurve::evaluate_orientation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Second sample offset as a fraction of the knot domain length.
    pub fractional_shift: f64,
    /// Direction that the identity orientation points along.
    pub reference_direction: Vector3,
    pub overshoot: Overshoot,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            fractional_shift: DEFAULT_FRACTIONAL_SHIFT,
            reference_direction: Vector3::new(0.0, 0.0, -1.0),
            overshoot: Overshoot::Extrapolate,
        }
    }
}

impl EvalConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_fractional_shift(mut self, shift: f64) -> Self {
        self.fractional_shift = shift;
        self
    }

    pub fn with_overshoot(mut self, overshoot: Overshoot) -> Self {
        self.overshoot = overshoot;
        self
    }
}
