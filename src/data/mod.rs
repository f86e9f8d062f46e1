//! Dosing-data contracts
//!
//! The solver hands each residual evaluation a plain numeric vector whose
//! layout is fixed per variant. The views here validate that layout once,
//! at the start of a call, and expose named accessors instead of raw
//! indexing.

pub mod linode;
pub use linode::LinOde;

use crate::error::SteadySolError;

/// Validated view over the fixed-dose data vector
///
/// Layout: `[rate_1, ..., rate_n, amt]` (n + 1 elements), where the first n
/// entries are the per-compartment continuous infusion rates and the trailing
/// entry is the delivered dose amount.
#[derive(Debug, Clone, Copy)]
pub struct FixedDoseData<'a> {
    rates: &'a [f64],
    amt: f64,
}

impl<'a> FixedDoseData<'a> {
    /// Validate `dat` against the fixed-dose layout for `ncmt` compartments
    pub fn new(dat: &'a [f64], ncmt: usize) -> Result<Self, SteadySolError> {
        if dat.len() != ncmt + 1 {
            return Err(SteadySolError::InvalidDoseData {
                expected: ncmt + 1,
                actual: dat.len(),
            });
        }
        Ok(Self {
            rates: &dat[..ncmt],
            amt: dat[ncmt],
        })
    }

    /// Per-compartment continuous infusion rates
    pub fn rates(&self) -> &[f64] {
        self.rates
    }

    /// Delivered dose amount
    pub fn amt(&self) -> f64 {
        self.amt
    }

    /// Infusion rate into the dose compartment (1-based index)
    pub fn rate_into(&self, cmt: usize) -> f64 {
        self.rates[cmt - 1]
    }
}

/// Validated view over the variable-dose data vector
///
/// Layout: `[rate_1, ..., rate_n]` (n elements). The dose amount is not part
/// of this vector; it travels as the trailing element of the parameter vector
/// so that it can carry derivative information.
#[derive(Debug, Clone, Copy)]
pub struct VariableDoseData<'a> {
    rates: &'a [f64],
}

impl<'a> VariableDoseData<'a> {
    /// Validate `dat` against the variable-dose layout for `ncmt` compartments
    pub fn new(dat: &'a [f64], ncmt: usize) -> Result<Self, SteadySolError> {
        if dat.len() != ncmt {
            return Err(SteadySolError::InvalidDoseData {
                expected: ncmt,
                actual: dat.len(),
            });
        }
        Ok(Self { rates: dat })
    }

    /// Per-compartment continuous infusion rates
    pub fn rates(&self) -> &[f64] {
        self.rates
    }

    /// Infusion rate into the dose compartment (1-based index)
    pub fn rate_into(&self, cmt: usize) -> f64 {
        self.rates[cmt - 1]
    }
}

/// Check that the 1-based dose compartment index lies in `1..=ncmt`
pub(crate) fn check_compartment(cmt: usize, ncmt: usize) -> Result<(), SteadySolError> {
    if cmt == 0 || cmt > ncmt {
        return Err(SteadySolError::InvalidDoseCompartment { cmt, ncmt });
    }
    Ok(())
}
