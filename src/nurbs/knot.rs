//! Knot vector utilities: validation and the default knot layout.
//!
//! Knot vectors here are sized by curve *order* (degree + 1), so a valid
//! vector holds `n_ctrl + order` values.

/// Find multiplicity of knot value `u` in the knot vector.
pub fn knot_multiplicity(u: f64, knots: &[f64], tol: f64) -> usize {
    knots.iter().filter(|&&k| (k - u).abs() < tol).count()
}

/// Interior knot values repeated more than `order - 1` times.
///
/// The domain end values are skipped: clamped vectors repeat them `order`
/// times. Such knots leave a zero-length span inside the curve, which makes
/// the basis recurrence divide by zero there.
pub fn overfull_interior_knots(knots: &[f64], order: usize, tol: f64) -> Vec<f64> {
    let (start, end) = knot_domain(knots);
    let mut overfull: Vec<f64> = Vec::new();
    for &k in knots {
        if (k - start).abs() < tol || (k - end).abs() < tol {
            continue;
        }
        if overfull.iter().any(|&seen| (seen - k).abs() < tol) {
            continue;
        }
        if knot_multiplicity(k, knots, tol) > order.saturating_sub(1) {
            overfull.push(k);
        }
    }
    overfull
}

/// Check if a stored knot vector can be used as-is:
/// - Correct length: `n_ctrl + order`
/// - Non-decreasing
pub fn knot_vector_is_usable(knots: &[f64], n_ctrl: usize, order: usize) -> bool {
    if knots.len() != n_ctrl + order {
        return false;
    }
    knots.windows(2).all(|w| w[0] <= w[1])
}

/// Build the default knot vector for `n_ctrl` control points and `order`.
///
/// The first entries are 0.0 and the last `order` are 1.0. Interior knots
/// at index `k` (from `order` through `n_ctrl - 1`) take the value
/// `(k - 1) / (n_ctrl - 1)`. This is an index-shifted ramp rather than the
/// textbook open-uniform `(k - order + 1) / (n_ctrl - order + 1)`; it is kept
/// so existing content evaluates the same way.
pub fn derive_default_knots(n_ctrl: usize, order: usize) -> Vec<f64> {
    let m = n_ctrl + order;
    let mut knots = vec![0.0; m];

    for k in order..n_ctrl {
        knots[k] = (k as f64 - 1.0) / (n_ctrl as f64 - 1.0);
    }

    for knot in knots.iter_mut().skip(m.saturating_sub(order)) {
        *knot = 1.0;
    }

    knots
}

/// The `[first, last]` span of the knot vector.
pub fn knot_domain(knots: &[f64]) -> (f64, f64) {
    match (knots.first(), knots.last()) {
        (Some(&a), Some(&b)) => (a, b),
        _ => (0.0, 0.0),
    }
}
