//! Error type shared by curve validation and orientation evaluation.

/// Result alias for fallible curve operations.
pub type Result<T> = std::result::Result<T, NurbsError>;

/// Errors that can occur while evaluating a curve.
///
/// Knot vector length and weight count mismatches are not errors; they are
/// repaired in place by [`crate::nurbs::NurbsCurve::ensure_valid`].
#[derive(Debug, thiserror::Error)]
pub enum NurbsError {
    #[error("no control point source is set")]
    MissingControlPoints,
    #[error("curve of order {order} needs at least {order} control points, got {count}")]
    InsufficientControlPoints { count: usize, order: usize },
    #[error("curve order must be >= 2, got {0}")]
    InvalidOrder(usize),
    #[error("expected {expected} knots, got {got}")]
    KnotCount { expected: usize, got: usize },
    #[error("expected {expected} weights, got {got}")]
    WeightCount { expected: usize, got: usize },
    #[error("shared curve lock was poisoned")]
    Poisoned,
    #[error("invalid evaluation config: {0}")]
    Config(#[from] serde_json::Error),
}
