use nalgebra::DVector;
use tracing::trace;

use crate::data::{check_compartment, FixedDoseData};
use crate::error::SteadySolError;
use crate::scalar::{lift_rhs_vector, lift_vector, DoseScalar, Promote};
use crate::simulator::{DiffEq, Integrator, V};

use super::{single_state, trough_residual, Regime, SteadyStateSystem};

/// Steady-state residual system with fixed dosing data
///
/// Both the delivered dose amount and the infusion rates are plain data,
/// supplied per call in the fixed-dose layout `[rate_1, ..., rate_n, amt]`.
///
/// Per [`Regime`]:
/// - **Bolus**: the steady-state trough, plus the dose, integrated over one
///   full interval, must return to the same trough.
/// - **Truncated infusion**: the infusion runs for `amt / rate`, then the
///   remainder of the interval is rate-free. An infusion that does not finish
///   before the next dose is rejected.
/// - **Constant infusion** (no periodicity): at steady state the derivative
///   is identically zero, so the derivative itself is the residual and no
///   integration is performed.
#[derive(Debug, Clone)]
pub struct FixedDose<F, I> {
    diffeq: F,
    ii: f64,
    cmt: usize,
    integrator: I,
}

impl<F, I> FixedDose<F, I>
where
    F: DiffEq,
    I: Integrator,
{
    /// Create a new fixed-dose residual system
    ///
    /// # Arguments
    ///
    /// * `diffeq` - The compartmental model derivative function
    /// * `ii` - Interdose interval; `ii <= 0` means no periodicity
    /// * `cmt` - Dose compartment (1-based)
    /// * `integrator` - The trajectory integrator
    pub fn new(diffeq: F, ii: f64, cmt: usize, integrator: I) -> Self {
        Self {
            diffeq,
            ii,
            cmt,
            integrator,
        }
    }

    /// Interdose interval
    pub fn ii(&self) -> f64 {
        self.ii
    }

    /// Dose compartment (1-based)
    pub fn cmt(&self) -> usize {
        self.cmt
    }

    fn eval<S: DoseScalar>(
        &self,
        x: V<S>,
        p: &[S],
        dat: &[f64],
        dat_int: &[i32],
    ) -> Result<V<S>, SteadySolError> {
        let n = x.len();
        check_compartment(self.cmt, n)?;
        let data = FixedDoseData::new(dat, n)?;
        let rate = data.rate_into(self.cmt);
        let regime = Regime::classify(rate, self.ii);
        trace!(
            ?regime,
            ii = self.ii,
            cmt = self.cmt,
            "fixed-dose steady-state residual"
        );

        match regime {
            Regime::Bolus => {
                let mut dosed = x.clone();
                dosed[self.cmt - 1] += S::from(data.amt());
                let pred = single_state(self.integrator.integrate(
                    &self.diffeq,
                    dosed,
                    0.0,
                    &[self.ii],
                    p,
                    data.rates(),
                    dat_int,
                )?)?;
                Ok(trough_residual(&x, &pred))
            }
            Regime::TruncatedInfusion => {
                let delta = data.amt() / rate;
                if delta > self.ii {
                    return Err(SteadySolError::InfusionExceedsInterval {
                        delta,
                        ii: self.ii,
                    });
                }
                let stopped = single_state(self.integrator.integrate(
                    &self.diffeq,
                    x.clone(),
                    0.0,
                    &[delta],
                    p,
                    data.rates(),
                    dat_int,
                )?)?;
                let off = vec![0.0; n];
                let pred = single_state(self.integrator.integrate(
                    &self.diffeq,
                    stopped,
                    0.0,
                    &[self.ii - delta],
                    p,
                    &off,
                    dat_int,
                )?)?;
                Ok(trough_residual(&x, &pred))
            }
            Regime::ConstantInfusion => {
                self.diffeq
                    .derivative(0.0, &x, p, data.rates(), dat_int, 0)
            }
        }
    }
}

impl<F, I> SteadyStateSystem for FixedDose<F, I>
where
    F: DiffEq,
    I: Integrator,
{
    fn residual<T0, T1>(
        &self,
        x: &DVector<T0>,
        y: &DVector<T1>,
        dat: &[f64],
        dat_int: &[i32],
    ) -> Result<DVector<<T0 as Promote<T1>>::Output>, SteadySolError>
    where
        T0: Promote<T1>,
        T1: DoseScalar,
    {
        let x0 = lift_vector::<T0, T1>(x);
        let p = lift_rhs_vector::<T0, T1>(y);
        self.eval(x0, p.as_slice(), dat, dat_int)
    }
}
