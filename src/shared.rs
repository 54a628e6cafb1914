//! A curve that several threads can update and evaluate.
//!
//! Updates and the validate-and-repair step run under one mutex. Evaluation
//! itself runs on a snapshot taken while the lock is held, so a concurrent
//! update never changes the curve halfway through an evaluation.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::EvalConfig;
use crate::error::{NurbsError, Result};
use crate::math::{Orientation, Point3};
use crate::nurbs::NurbsCurve;

#[derive(Clone, Debug)]
pub struct SharedCurve {
    inner: Arc<Mutex<NurbsCurve>>,
}

impl SharedCurve {
    pub fn new(curve: NurbsCurve) -> Self {
        Self {
            inner: Arc::new(Mutex::new(curve)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, NurbsCurve>> {
        self.inner.lock().map_err(|_| NurbsError::Poisoned)
    }

    pub fn set_control_points(&self, points: Vec<Point3>) -> Result<()> {
        self.lock()?.control_points = points;
        Ok(())
    }

    pub fn set_weights(&self, weights: Vec<f64>) -> Result<()> {
        self.lock()?.weights = weights;
        Ok(())
    }

    pub fn set_knots(&self, knots: Vec<f64>) -> Result<()> {
        self.lock()?.knots = knots;
        Ok(())
    }

    pub fn set_order(&self, order: usize) -> Result<()> {
        self.lock()?.order = order;
        Ok(())
    }

    /// Repair the stored curve and return a copy of it.
    pub fn snapshot(&self) -> Result<NurbsCurve> {
        let mut curve = self.lock()?;
        curve.ensure_valid_in_place()?;
        Ok(curve.clone())
    }

    pub fn evaluate_orientation(&self, u: f64, config: &EvalConfig) -> Result<Orientation> {
        let curve = self.snapshot()?;
        Ok(curve.orientation_at(u, config))
    }
}
