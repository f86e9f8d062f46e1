//! Collaborator interfaces for the residual systems
//!
//! The residuals never integrate anything themselves. They call into two
//! opaque collaborators: the model derivative function and a trajectory
//! integrator, both expressed as single-method traits so that production
//! backends and test doubles are interchangeable. Both are written
//! generically over [`DoseScalar`] so derivative information carried by the
//! state or the parameters propagates through every call.

use nalgebra::DVector;

use crate::error::SteadySolError;
use crate::scalar::DoseScalar;

/// State and parameter vector type, generic over the scalar
pub type V<S> = DVector<S>;

/// The compartmental model derivative function
///
/// A pure function of its inputs, differentiable in state and parameters:
/// - `t`: the time at which the derivative is evaluated
/// - `x`: the state vector at time `t`
/// - `p`: the model parameters; use the [fetch_params!](crate::fetch_params)
///   macro to unpack them
/// - `rateiv`: per-compartment continuous infusion rates, plain data
/// - `dat_int`: auxiliary integer data, passed through opaquely
/// - `flag`: extra model flag, forwarded unchanged from the caller
///
/// Returns the derivative vector, one entry per compartment.
pub trait DiffEq {
    fn derivative<S: DoseScalar>(
        &self,
        t: f64,
        x: &V<S>,
        p: &[S],
        rateiv: &[f64],
        dat_int: &[i32],
        flag: i32,
    ) -> Result<V<S>, SteadySolError>;
}

/// The trajectory integrator
///
/// Advances `x0` from `t0` and reports the state at each requested
/// observation time, in the same order. Implementations must be written
/// generically over the scalar so that dual-number states and parameters
/// propagate their derivative information through the integration.
///
/// Any suspension, retry or step-size policy is internal to the
/// implementation; failures are surfaced as errors and pass through the
/// residual systems unchanged.
pub trait Integrator {
    #[allow(clippy::too_many_arguments)]
    fn integrate<S: DoseScalar, F: DiffEq>(
        &self,
        f: &F,
        x0: V<S>,
        t0: f64,
        ts: &[f64],
        p: &[S],
        rateiv: &[f64],
        dat_int: &[i32],
    ) -> Result<Vec<V<S>>, SteadySolError>;
}
