//! NURBS (Non-Uniform Rational B-Spline) curves.
//!
//! This module holds the evaluation core: knot vector handling, span and
//! basis function computation, rational point evaluation, and the
//! finite-difference orientation built on top of it.

pub mod basis;
pub mod cache;
pub mod knot;

use rayon::prelude::*;

use crate::config::EvalConfig;
use crate::error::{NurbsError, Result};
use crate::math::{Orientation, Point3, Vector3, PARAM_TOL};
use crate::orient;

use self::cache::BasisCache;

/// Evaluate a rational curve point at `u`.
///
/// Sums `N_j * w_j * P_j` over the `degree + 1` active control points and
/// divides by `sum(N_j * w_j)`. `points` and `weights` must have the same
/// length and `knots` must hold `points.len() + degree + 1` values.
pub fn curve_point_rational(
    degree: usize,
    knots: &[f64],
    points: &[Point3],
    weights: &[f64],
    u: f64,
) -> Result<Point3> {
    check_layout(degree, knots, points)?;
    if weights.len() != points.len() {
        return Err(NurbsError::WeightCount {
            expected: points.len(),
            got: weights.len(),
        });
    }
    Ok(rational_point(degree, knots, points, weights, u))
}

/// Evaluate a plain (non-rational) B-spline point at `u`.
pub fn curve_point_nonrational(
    degree: usize,
    knots: &[f64],
    points: &[Point3],
    u: f64,
) -> Result<Point3> {
    check_layout(degree, knots, points)?;
    let n = points.len() - 1;
    let span = basis::find_span(n, degree, u, knots);
    let b = basis::basis_funs(span, u, degree, knots);

    let mut point = Vector3::zeros();
    for (i, bi) in b.iter().enumerate() {
        point += *bi * points[span - degree + i].coords;
    }
    Ok(Point3::from(point))
}

/// Enough points for the degree and a knot vector sized to match.
fn check_layout(degree: usize, knots: &[f64], points: &[Point3]) -> Result<()> {
    if points.is_empty() {
        return Err(NurbsError::MissingControlPoints);
    }
    if points.len() <= degree {
        return Err(NurbsError::InsufficientControlPoints {
            count: points.len(),
            order: degree + 1,
        });
    }
    let expected = points.len() + degree + 1;
    if knots.len() != expected {
        return Err(NurbsError::KnotCount {
            expected,
            got: knots.len(),
        });
    }
    Ok(())
}

fn rational_point(
    degree: usize,
    knots: &[f64],
    points: &[Point3],
    weights: &[f64],
    u: f64,
) -> Point3 {
    let n = points.len() - 1;
    let span = basis::find_span(n, degree, u, knots);
    let b = basis::basis_funs(span, u, degree, knots);
    weighted_sum(span, degree, &b, points, weights)
}

fn weighted_sum(
    span: usize,
    degree: usize,
    basis: &[f64],
    points: &[Point3],
    weights: &[f64],
) -> Point3 {
    let mut point = Vector3::zeros();
    let mut w = 0.0;

    for (i, bi) in basis.iter().enumerate() {
        let idx = span - degree + i;
        let bw = bi * weights[idx];
        point += bw * points[idx].coords;
        w += bw;
    }

    Point3::from(point / w)
}

/// What [`NurbsCurve::ensure_valid_in_place`] had to fix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Repairs {
    pub knots_rebuilt: bool,
    pub weights_reset: bool,
}

impl Repairs {
    pub fn any(&self) -> bool {
        self.knots_rebuilt || self.weights_reset
    }
}

/// A Non-Uniform Rational B-Spline curve in 3D, described by its order.
///
/// Knots and weights may be left empty or mismatched; they are replaced
/// with defaults when the curve is validated before evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct NurbsCurve {
    pub order: usize,
    pub knots: Vec<f64>,
    pub control_points: Vec<Point3>,
    pub weights: Vec<f64>,
}

impl NurbsCurve {
    /// A curve with default knots and uniform weights.
    pub fn new(control_points: Vec<Point3>, order: usize) -> Self {
        Self {
            order,
            knots: Vec::new(),
            control_points,
            weights: Vec::new(),
        }
    }

    pub fn with_knots(mut self, knots: Vec<f64>) -> Self {
        self.knots = knots;
        self
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = weights;
        self
    }

    pub fn degree(&self) -> usize {
        self.order.saturating_sub(1)
    }

    /// Number of control points.
    pub fn num_control_points(&self) -> usize {
        self.control_points.len()
    }

    /// The parameter domain `[knots[0], knots[last]]`.
    pub fn domain(&self) -> (f64, f64) {
        knot::knot_domain(&self.knots)
    }

    /// Reject inputs that cannot be repaired.
    pub fn check_inputs(&self) -> Result<()> {
        if self.order < 2 {
            return Err(NurbsError::InvalidOrder(self.order));
        }
        if self.control_points.len() < self.order {
            return Err(NurbsError::InsufficientControlPoints {
                count: self.control_points.len(),
                order: self.order,
            });
        }
        Ok(())
    }

    /// Replace a malformed knot vector or weight array with defaults.
    ///
    /// Calling this on an already valid curve changes nothing.
    pub fn ensure_valid_in_place(&mut self) -> Result<Repairs> {
        self.check_inputs()?;
        let n_ctrl = self.control_points.len();
        let mut repairs = Repairs::default();

        if self.weights.len() != n_ctrl {
            if !self.weights.is_empty() {
                log::debug!(
                    "weight count {} does not match {} control points, using uniform weights",
                    self.weights.len(),
                    n_ctrl
                );
            }
            self.weights = vec![1.0; n_ctrl];
            repairs.weights_reset = true;
        }

        if !knot::knot_vector_is_usable(&self.knots, n_ctrl, self.order) {
            if self.knots.len() == n_ctrl + self.order {
                log::warn!("knot vector is not non-decreasing, replacing with default knots");
            } else if !self.knots.is_empty() {
                log::debug!(
                    "knot vector has {} values, expected {}; using default knots",
                    self.knots.len(),
                    n_ctrl + self.order
                );
            }
            self.knots = knot::derive_default_knots(n_ctrl, self.order);
            repairs.knots_rebuilt = true;
        } else {
            let overfull = knot::overfull_interior_knots(&self.knots, self.order, PARAM_TOL);
            if !overfull.is_empty() {
                log::warn!(
                    "knots {overfull:?} repeat more than {} times; basis values there are undefined",
                    self.order - 1
                );
            }
        }

        Ok(repairs)
    }

    /// Consuming form of [`Self::ensure_valid_in_place`].
    pub fn ensure_valid(mut self) -> Result<Self> {
        self.ensure_valid_in_place()?;
        Ok(self)
    }

    /// Evaluate the curve at `u`.
    ///
    /// Unlike [`Self::evaluate_orientation`] this does not repair the curve;
    /// missing knots or weights are reported as errors.
    pub fn point_at(&self, u: f64) -> Result<Point3> {
        self.check_inputs()?;
        curve_point_rational(
            self.degree(),
            &self.knots,
            &self.control_points,
            &self.weights,
            u,
        )
    }

    /// Point at `u` on a curve that has already been validated.
    fn point_at_valid(&self, u: f64) -> Point3 {
        rational_point(
            self.degree(),
            &self.knots,
            &self.control_points,
            &self.weights,
            u,
        )
    }

    fn point_at_cached(&self, u: f64, cache: &mut BasisCache) -> Point3 {
        let degree = self.degree();
        let span = basis::find_span(self.control_points.len() - 1, degree, u, &self.knots);
        let b = cache.basis(span, u, degree, &self.knots);
        weighted_sum(span, degree, b, &self.control_points, &self.weights)
    }

    /// Validate the curve, then compute the orientation at `u`.
    ///
    /// The orientation rotates `config.reference_direction` onto
    /// `C(u) - C(u + shift)`, where `shift` is `config.fractional_shift` of
    /// the knot domain length.
    pub fn evaluate_orientation(&mut self, u: f64, config: &EvalConfig) -> Result<Orientation> {
        self.ensure_valid_in_place()?;
        Ok(self.orientation_at(u, config))
    }

    /// Same as [`Self::evaluate_orientation`], reusing basis values from `cache`.
    pub fn evaluate_orientation_cached(
        &mut self,
        u: f64,
        config: &EvalConfig,
        cache: &mut BasisCache,
    ) -> Result<Orientation> {
        self.ensure_valid_in_place()?;
        let u1 = orient::shifted_parameter(u, self.domain(), config);
        let p0 = self.point_at_cached(u, cache);
        let p1 = self.point_at_cached(u1, cache);
        Ok(orient::orientation_from_samples(&p0, &p1, &config.reference_direction))
    }

    /// Validate once, then evaluate orientations for every parameter in
    /// parallel. Results keep the order of `params`.
    pub fn sample_orientations(
        &mut self,
        params: &[f64],
        config: &EvalConfig,
    ) -> Result<Vec<Orientation>> {
        self.ensure_valid_in_place()?;
        let curve = &*self;
        Ok(params
            .par_iter()
            .map(|&u| curve.orientation_at(u, config))
            .collect())
    }

    /// Orientation at `u` on a curve that has already been validated.
    pub(crate) fn orientation_at(&self, u: f64, config: &EvalConfig) -> Orientation {
        let u1 = orient::shifted_parameter(u, self.domain(), config);
        let p0 = self.point_at_valid(u);
        let p1 = self.point_at_valid(u1);
        log::trace!("orientation samples u={u}: {p0:?}, u={u1}: {p1:?}");
        orient::orientation_from_samples(&p0, &p1, &config.reference_direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Straight line from (0,0,0) to (2,0,0) as a single quadratic segment.
    fn make_line_curve() -> NurbsCurve {
        NurbsCurve::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ],
            3,
        )
        .ensure_valid()
        .unwrap()
    }

    /// Quarter circle in XY: rational Bezier with weight 1/sqrt(2) in the middle.
    fn make_quarter_circle(radius: f64) -> NurbsCurve {
        NurbsCurve::new(
            vec![
                Point3::new(radius, 0.0, 0.0),
                Point3::new(radius, radius, 0.0),
                Point3::new(0.0, radius, 0.0),
            ],
            3,
        )
        .with_knots(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
        .with_weights(vec![1.0, std::f64::consts::FRAC_1_SQRT_2, 1.0])
        .ensure_valid()
        .unwrap()
    }

    #[test]
    fn line_curve_endpoints() {
        let curve = make_line_curve();
        assert_relative_eq!(curve.point_at(0.0).unwrap(), Point3::origin(), epsilon = 1e-14);
        assert_relative_eq!(curve.point_at(1.0).unwrap(), Point3::new(2.0, 0.0, 0.0), epsilon = 1e-14);
    }

    #[test]
    fn line_curve_midpoint() {
        let curve = make_line_curve();
        assert_relative_eq!(curve.point_at(0.5).unwrap().x, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn quarter_circle_on_circle() {
        let r = 5.0;
        let curve = make_quarter_circle(r);
        for i in 0..=20 {
            let u = i as f64 / 20.0;
            let p = curve.point_at(u).unwrap();
            let dist = (p.x * p.x + p.y * p.y).sqrt();
            assert!(
                (dist - r).abs() < 1e-12,
                "Point at u={u} has distance {dist} from origin, expected {r}"
            );
        }
    }

    #[test]
    fn quarter_circle_tangent_follows_circle() {
        let curve = make_quarter_circle(1.0);
        let cfg = EvalConfig::default().with_fractional_shift(1e-6);
        let reference = cfg.reference_direction;
        for i in 1..10 {
            let u = i as f64 / 10.0;
            let q = curve.orientation_at(u, &cfg);
            let dir = q * reference;
            let radius_dir = curve.point_at(u).unwrap().coords;
            assert!(
                dir.dot(&radius_dir).abs() < 1e-4,
                "direction should be tangent to the circle at u={u}"
            );
        }
    }

    #[test]
    fn unit_weights_match_nonrational() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(3.0, 2.0, 1.0),
            Point3::new(4.0, 0.0, 2.0),
            Point3::new(6.0, -1.0, 2.0),
        ];
        let knots = knot::derive_default_knots(points.len(), 4);
        let weights = vec![1.0; points.len()];
        for i in 0..=40 {
            let u = i as f64 / 40.0;
            let rational = curve_point_rational(3, &knots, &points, &weights, u).unwrap();
            let plain = curve_point_nonrational(3, &knots, &points, u).unwrap();
            assert_relative_eq!(rational, plain, epsilon = 1e-12);
        }
    }

    #[test]
    fn heavier_weight_pulls_curve() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let knots = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let plain = curve_point_rational(2, &knots, &points, &[1.0, 1.0, 1.0], 0.5).unwrap();
        let pulled = curve_point_rational(2, &knots, &points, &[1.0, 4.0, 1.0], 0.5).unwrap();
        assert!(pulled.y > plain.y);
    }

    #[test]
    fn rejects_low_order() {
        let mut curve = NurbsCurve::new(vec![Point3::origin(); 3], 1);
        assert!(matches!(
            curve.ensure_valid_in_place(),
            Err(NurbsError::InvalidOrder(1))
        ));
    }

    #[test]
    fn rejects_too_few_points() {
        let mut curve = NurbsCurve::new(vec![Point3::origin(); 2], 3);
        let err = curve
            .evaluate_orientation(0.5, &EvalConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            NurbsError::InsufficientControlPoints { count: 2, order: 3 }
        ));
    }

    #[test]
    fn repairs_report_what_changed() {
        let mut curve = NurbsCurve::new(vec![Point3::origin(); 4], 3).with_weights(vec![2.0]);
        let first = curve.ensure_valid_in_place().unwrap();
        assert!(first.knots_rebuilt && first.weights_reset);
        let second = curve.ensure_valid_in_place().unwrap();
        assert!(!second.any());
    }

    #[test]
    fn decreasing_knots_replaced() {
        let mut curve = NurbsCurve::new(vec![Point3::origin(); 4], 3)
            .with_knots(vec![0.0, 0.0, 0.0, 0.9, 0.2, 1.0, 1.0]);
        let repairs = curve.ensure_valid_in_place().unwrap();
        assert!(repairs.knots_rebuilt);
        assert_eq!(curve.knots, knot::derive_default_knots(4, 3));
    }

    #[test]
    fn nan_knots_replaced() {
        let mut curve = NurbsCurve::new(vec![Point3::origin(); 4], 3)
            .with_knots(vec![0.0, 0.0, 0.0, f64::NAN, 1.0, 1.0, 1.0]);
        let repairs = curve.ensure_valid_in_place().unwrap();
        assert!(repairs.knots_rebuilt);
        assert!(curve.knots.iter().all(|k| k.is_finite()));
    }

    #[test]
    fn overfull_knots_are_kept() {
        let knots = vec![0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0];
        let mut curve = NurbsCurve::new(vec![Point3::origin(); 6], 3).with_knots(knots.clone());
        let repairs = curve.ensure_valid_in_place().unwrap();
        assert!(!repairs.knots_rebuilt);
        assert_eq!(curve.knots, knots);
    }

    #[test]
    fn point_at_unvalidated_curve_is_error() {
        let curve = NurbsCurve::new(vec![Point3::origin(); 4], 3);
        assert!(matches!(
            curve.point_at(0.5),
            Err(NurbsError::KnotCount { expected: 7, got: 0 })
        ));
    }

    #[test]
    fn point_at_mismatched_weights_is_error() {
        let curve = NurbsCurve::new(vec![Point3::origin(); 4], 3)
            .with_knots(knot::derive_default_knots(4, 3))
            .with_weights(vec![1.0; 3]);
        assert!(matches!(
            curve.point_at(0.5),
            Err(NurbsError::WeightCount { expected: 4, got: 3 })
        ));
    }

    #[test]
    fn point_at_empty_curve_is_error() {
        let curve = NurbsCurve::new(Vec::new(), 3);
        assert!(curve.point_at(0.5).is_err());
    }

    #[test]
    fn free_functions_reject_bad_layout() {
        let knots = vec![0.0, 0.0, 1.0, 1.0];
        assert!(matches!(
            curve_point_rational(1, &knots, &[], &[], 0.5),
            Err(NurbsError::MissingControlPoints)
        ));
        assert!(matches!(
            curve_point_nonrational(3, &knots, &[Point3::origin(); 2], 0.5),
            Err(NurbsError::InsufficientControlPoints { count: 2, order: 4 })
        ));
    }

    #[test]
    fn point_at_revalidates_after_field_edit() {
        let mut curve = make_line_curve();
        assert!(curve.point_at(0.5).is_ok());
        curve.control_points.push(Point3::new(3.0, 0.0, 0.0));
        assert!(curve.point_at(0.5).is_err());
    }

    #[test]
    fn valid_knots_are_kept() {
        let knots = vec![0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0];
        let curve = NurbsCurve::new(vec![Point3::origin(); 4], 3)
            .with_knots(knots.clone())
            .ensure_valid()
            .unwrap();
        assert_eq!(curve.knots, knots);
    }

    #[test]
    fn cached_matches_uncached() {
        let mut curve = make_quarter_circle(2.0);
        let cfg = EvalConfig::default();
        let mut cache = BasisCache::new();
        for i in 0..=10 {
            let u = i as f64 / 10.0;
            let direct = curve.evaluate_orientation(u, &cfg).unwrap();
            let cached = curve.evaluate_orientation_cached(u, &cfg, &mut cache).unwrap();
            assert_relative_eq!(direct, cached, epsilon = 1e-15);
        }
        assert_eq!(cache.stats().misses, 22);
        assert_eq!(cache.stats().invalidations, 0);
    }
}
