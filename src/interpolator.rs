//! Collaborator-facing orientation interpolator.
//!
//! Mirrors the fields a scene-graph node exposes (`order`, `knot`,
//! `controlPoint`, `weight`) and turns a `set_fraction` input into a
//! `value_changed` output. Routing and timestamps belong to the caller; the
//! interpolator only carries the input timestamp through.

use std::mem;

use crate::config::EvalConfig;
use crate::error::{NurbsError, Result};
use crate::math::{self, Orientation, Point3};
use crate::nurbs::NurbsCurve;

/// Output event of [`NurbsOrientationInterpolator::set_fraction`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueChanged {
    pub value: Orientation,
    pub timestamp: f64,
}

impl ValueChanged {
    /// The orientation as `[x, y, z, angle]`.
    pub fn axis_angle(&self) -> [f64; 4] {
        math::to_axis_angle(&self.value)
    }
}

#[derive(Clone, Debug)]
pub struct NurbsOrientationInterpolator {
    pub order: usize,
    pub knot: Vec<f64>,
    pub control_point: Option<Vec<Point3>>,
    pub weight: Vec<f64>,
    pub config: EvalConfig,
    value_changed: Option<ValueChanged>,
}

impl Default for NurbsOrientationInterpolator {
    fn default() -> Self {
        Self {
            order: 3,
            knot: Vec::new(),
            control_point: None,
            weight: Vec::new(),
            config: EvalConfig::default(),
            value_changed: None,
        }
    }
}

impl NurbsOrientationInterpolator {
    pub fn new(control_point: Vec<Point3>) -> Self {
        Self {
            control_point: Some(control_point),
            ..Self::default()
        }
    }

    /// Evaluate at `fraction` and emit the resulting orientation.
    ///
    /// Malformed `knot` and `weight` fields are replaced with their defaults
    /// and the replacements stay stored on the interpolator.
    pub fn set_fraction(&mut self, fraction: f64, timestamp: f64) -> Result<ValueChanged> {
        let points = self
            .control_point
            .as_ref()
            .ok_or(NurbsError::MissingControlPoints)?;

        let mut curve = NurbsCurve {
            order: self.order,
            knots: mem::take(&mut self.knot),
            control_points: points.clone(),
            weights: mem::take(&mut self.weight),
        };
        let result = curve.evaluate_orientation(fraction, &self.config);
        self.knot = curve.knots;
        self.weight = curve.weights;

        let event = ValueChanged {
            value: result?,
            timestamp,
        };
        self.value_changed = Some(event);
        Ok(event)
    }

    /// The most recent output, if any evaluation has succeeded.
    pub fn value_changed(&self) -> Option<&ValueChanged> {
        self.value_changed.as_ref()
    }
}
