//! NURBS curve evaluation and tangent-following orientation interpolation.
//!
//! A [`nurbs::NurbsCurve`] is evaluated with the Cox-de Boor recurrence and
//! turned into an orientation by sampling two nearby curve points and
//! rotating a fixed reference direction onto their difference.

pub mod config;
pub mod error;
pub mod interpolator;
pub mod math;
pub mod nurbs;
pub mod orient;
pub mod shared;

pub use config::{EvalConfig, Overshoot};
pub use error::{NurbsError, Result};
pub use interpolator::{NurbsOrientationInterpolator, ValueChanged};
pub use nurbs::NurbsCurve;
pub use shared::SharedCurve;
