//! Knot span lookup and Cox-de Boor basis function evaluation.
//!
//! Algorithms A2.1 and A2.2 from "The NURBS Book" (Piegl & Tiller). Both
//! take the curve *degree*, not its order.

/// Find the knot span index such that `knots[span] <= u < knots[span+1]`.
///
/// `n` is the index of the last control point (= num_control_points - 1).
/// `p` is the degree. Parameters at or past the domain end map to the last
/// span `n`, and parameters at or before the domain start map to `p`, so the
/// result can always index `p + 1` control points.
pub fn find_span(n: usize, p: usize, u: f64, knots: &[f64]) -> usize {
    let (first_span, last_span) = (p, n);
    let domain_start = knots[first_span];
    let domain_end = knots[last_span + 1];

    // Past the end the last polynomial piece extrapolates; this is how an
    // overshooting finite-difference sample gets evaluated.
    if u >= domain_end {
        return last_span;
    }
    if u <= domain_start {
        return first_span;
    }

    let mut lo = first_span;
    let mut hi = last_span + 1;
    let mut mid = (lo + hi) / 2;

    // A NaN parameter fails both comparisons and falls straight through.
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            hi = mid;
        } else {
            lo = mid;
        }
        mid = (lo + hi) / 2;
    }

    mid
}

/// Evaluate the `p + 1` non-zero basis functions at `u`.
///
/// Returns `N[span-p], ..., N[span]`. Denominators are not guarded: a knot
/// of multiplicity above `p` inside the span yields NaN, which callers
/// treat as a degenerate sample.
pub fn basis_funs(span: usize, u: f64, p: usize, knots: &[f64]) -> Vec<f64> {
    let mut n = vec![0.0; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];

    n[0] = 1.0;

    for j in 1..=p {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;

        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }

    n
}
