//! Orientation from a finite-difference curve direction.

use std::f64::consts::PI;

use nalgebra::Unit;

use crate::config::{EvalConfig, Overshoot};
use crate::math::{Orientation, Point3, Vector3, TOLERANCE};

/// Shortest-arc rotation taking `from` onto `to`.
///
/// Parallel vectors give the identity. Anti-parallel vectors give a half
/// turn about an axis perpendicular to `from`. A zero-length or non-finite
/// input also gives the identity.
pub fn rotation_between(from: &Vector3, to: &Vector3) -> Orientation {
    if !is_usable_direction(from) || !is_usable_direction(to) {
        log::debug!("degenerate direction {to:?}, using identity orientation");
        return Orientation::identity();
    }

    Orientation::rotation_between(from, to).unwrap_or_else(|| {
        Orientation::from_axis_angle(&perpendicular_axis(from), PI)
    })
}

/// Orientation for the two samples `p0 = C(u)` and `p1 = C(u + shift)`.
///
/// The direction is `p0 - p1`, which points back along decreasing `u`.
pub fn orientation_from_samples(p0: &Point3, p1: &Point3, reference: &Vector3) -> Orientation {
    let direction = p0 - p1;
    rotation_between(reference, &direction)
}

/// Parameter of the second finite-difference sample.
pub fn shifted_parameter(u: f64, domain: (f64, f64), config: &EvalConfig) -> f64 {
    let (start, end) = domain;
    let shifted = u + (end - start) * config.fractional_shift;
    match config.overshoot {
        Overshoot::Extrapolate => shifted,
        Overshoot::Clamp => shifted.min(end),
    }
}

fn is_usable_direction(v: &Vector3) -> bool {
    v.iter().all(|c| c.is_finite()) && v.norm() > TOLERANCE
}

/// Any unit axis perpendicular to `v`.
fn perpendicular_axis(v: &Vector3) -> Unit<Vector3> {
    let a = v.normalize();
    // Pick a seed not parallel to v
    let seed = if a.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    Unit::new_normalize(a.cross(&seed))
}
