//! Linear algebra type aliases and numeric tolerances.

pub type Point3 = nalgebra::Point3<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;

/// A rotation produced by orientation evaluation.
pub type Orientation = nalgebra::UnitQuaternion<f64>;

/// Directions shorter than this are treated as degenerate.
pub const TOLERANCE: f64 = 1e-12;

/// Parametric tolerance for knot comparisons.
pub const PARAM_TOL: f64 = 1e-12;

/// Convert an orientation to the `[x, y, z, angle]` axis-angle quadruple
/// used by scene-graph rotation fields.
///
/// The identity maps to `[0, 0, 1, 0]`.
pub fn to_axis_angle(q: &Orientation) -> [f64; 4] {
    match q.axis_angle() {
        Some((axis, angle)) => [axis.x, axis.y, axis.z, angle],
        None => [0.0, 0.0, 1.0, 0.0],
    }
}
