use nalgebra::{DMatrix, DVector};

use crate::scalar::DoseScalar;

/// Bundles the pieces a linear compartmental system hands to a solver
///
/// A purely structural container: the constant-coefficient system matrix, the
/// state at the start of the leg, and the per-compartment infusion rates. It
/// performs no computation of its own; a linear ODE solver (or a model
/// derivative function built from the matrix) consumes it.
#[derive(Debug, Clone)]
pub struct LinOde<S: DoseScalar> {
    t0: f64,
    y0: DVector<S>,
    rate: Vec<f64>,
    system: DMatrix<S>,
}

impl<S: DoseScalar> LinOde<S> {
    /// Create a new linear-system container
    ///
    /// # Arguments
    ///
    /// * `t0` - Time at the start of the leg
    /// * `y0` - State at `t0`
    /// * `rate` - Per-compartment continuous infusion rates
    /// * `system` - Constant-coefficient system matrix
    pub fn new(t0: f64, y0: DVector<S>, rate: Vec<f64>, system: DMatrix<S>) -> Self {
        Self {
            t0,
            y0,
            rate,
            system,
        }
    }

    /// Time at the start of the leg
    pub fn t0(&self) -> f64 {
        self.t0
    }

    /// State at `t0`
    pub fn y0(&self) -> &DVector<S> {
        &self.y0
    }

    /// Per-compartment continuous infusion rates
    pub fn rate(&self) -> &[f64] {
        &self.rate
    }

    /// Constant-coefficient system matrix
    pub fn system(&self) -> &DMatrix<S> {
        &self.system
    }
}
