use thiserror::Error;

/// Errors raised while evaluating a steady-state residual system
///
/// All variants are fail-fast: no partial residual is ever returned, and no
/// fallback approximation is attempted. Failures originating in the
/// integrator or the model derivative function pass through the
/// [External](SteadySolError::External) variant unchanged.
#[derive(Error, Debug)]
pub enum SteadySolError {
    /// The truncated infusion does not finish before the next dose
    #[error("Steady State Solution: infusion time (F * amt / rate) is {delta}, but must be smaller than the interdose interval (ii): {ii}")]
    InfusionExceedsInterval { delta: f64, ii: f64 },

    /// A truncated infusion with a dose amount carried as a parameter is a
    /// declared capability gap, not a numerical failure
    #[error("Steady State Solution: current version does not handle a multiple truncated infusion solution (i.e. ii > 0 and rate > 0) when F * amt is a parameter")]
    UnsupportedVariableDoseInfusion,

    /// The dosing-data vector violates the layout of the active variant
    #[error("Dosing data has {actual} elements, but the layout requires {expected}")]
    InvalidDoseData { expected: usize, actual: usize },

    /// The dose compartment index is outside `1..=n`
    #[error("Dose compartment {cmt} is out of range for a model with {ncmt} compartments")]
    InvalidDoseCompartment { cmt: usize, ncmt: usize },

    /// The variable-dose parameter vector is empty; its trailing element must
    /// hold the dose amount
    #[error("Variable-dose parameter vector is empty; the trailing element must hold the dose amount")]
    MissingDoseAmount,

    /// A failure from the integrator or the model derivative function,
    /// surfaced without reinterpretation
    #[error(transparent)]
    External(#[from] anyhow::Error),
}
