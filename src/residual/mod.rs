//! Steady-state residual systems
//!
//! Under periodic dosing, the steady state is the compartment-amount vector
//! that repeats identically at the same point of every dosing cycle. The
//! systems in this module map a candidate trough vector `x` to the
//! discrepancy between `x` and the state obtained by simulating one full
//! dosing cycle from it; an external root finder drives that discrepancy to
//! zero.
//!
//! Two variants cover the supported dosing configurations:
//! - [`FixedDose`]: dose amount and infusion rates are plain data
//! - [`VariableDose`]: the dose amount is itself a differentiable quantity
//!   (typically because bioavailability is a parameter) and travels as the
//!   trailing element of the parameter vector
//!
//! Both are immutable after construction and purely functional: identical
//! inputs produce bit-identical outputs, and no state persists across
//! invocations.

mod fixed;
mod variable;

pub use fixed::FixedDose;
pub use variable::VariableDose;

use nalgebra::DVector;
use serde::Deserialize;

use crate::error::SteadySolError;
use crate::scalar::{DoseScalar, Promote};

/// Dosing regime of a steady-state evaluation
///
/// Computed once per call from plain data only (the rate into the dose
/// compartment and the interdose interval), so the branch taken is the same
/// regardless of which quantities carry derivative information.
#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Regime {
    /// Instantaneous dose into the dose compartment, then one full interval
    Bolus,
    /// Infusion that stops within the interval, then a rate-free remainder
    TruncatedInfusion,
    /// No periodicity; drug is delivered at a constant rate forever
    ConstantInfusion,
}

impl Regime {
    /// Classify the regime from the rate into the dose compartment and the
    /// interdose interval
    ///
    /// The comparisons are exact, never tolerance-based: a nonzero rate of
    /// any magnitude is an infusion.
    pub fn classify(rate: f64, ii: f64) -> Self {
        if rate == 0.0 {
            Regime::Bolus
        } else if ii > 0.0 {
            Regime::TruncatedInfusion
        } else {
            Regime::ConstantInfusion
        }
    }
}

/// The algebraic system whose root is the steady state
///
/// An implementor is a functor over `(x, y, dat, dat_int)`: the candidate
/// trough, the parameter vector, the plain dosing data in the variant's
/// layout, and opaque integer data. The residual's scalar type is the
/// promotion of the scalar types of `x` and `y`.
pub trait SteadyStateSystem {
    fn residual<T0, T1>(
        &self,
        x: &DVector<T0>,
        y: &DVector<T1>,
        dat: &[f64],
        dat_int: &[i32],
    ) -> Result<DVector<<T0 as Promote<T1>>::Output>, SteadySolError>
    where
        T0: Promote<T1>,
        T1: DoseScalar;
}

/// Trough minus the simulated end-of-cycle state
pub(crate) fn trough_residual<S: DoseScalar>(x: &DVector<S>, pred: &DVector<S>) -> DVector<S> {
    DVector::from_fn(x.len(), |i, _| x[i] - pred[i])
}

/// Take the state at the single requested observation time
pub(crate) fn single_state<S: DoseScalar>(
    mut states: Vec<DVector<S>>,
) -> Result<DVector<S>, SteadySolError> {
    if states.is_empty() {
        return Err(
            anyhow::anyhow!("integrator returned no states for the requested observation time")
                .into(),
        );
    }
    Ok(states.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::Regime;

    #[test]
    fn regime_split_is_exact() {
        assert_eq!(Regime::classify(0.0, 12.0), Regime::Bolus);
        assert_eq!(Regime::classify(0.0, 0.0), Regime::Bolus);

        // any nonzero rate is an infusion, down to the smallest denormal
        assert_eq!(Regime::classify(5e-324, 12.0), Regime::TruncatedInfusion);
        assert_eq!(Regime::classify(-1.5, 6.0), Regime::TruncatedInfusion);

        assert_eq!(Regime::classify(2.0, 0.0), Regime::ConstantInfusion);
        assert_eq!(Regime::classify(2.0, -1.0), Regime::ConstantInfusion);
    }
}
