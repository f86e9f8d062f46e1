use nalgebra::DVector;
use tracing::trace;

use crate::data::{check_compartment, VariableDoseData};
use crate::error::SteadySolError;
use crate::scalar::{lift_rhs_vector, lift_vector, DoseScalar, Promote};
use crate::simulator::{DiffEq, Integrator, V};

use super::{single_state, trough_residual, Regime, SteadyStateSystem};

/// Steady-state residual system with a dose amount that is itself a parameter
///
/// This usually happens because bioavailability is a parameter, making the
/// delivered amount a transformed parameter. The amount travels as the
/// trailing element of `y` so it can carry derivative information; `dat`
/// holds only the per-compartment rates. The parameter vector handed to the
/// model excludes that trailing element.
///
/// A truncated infusion (`rate != 0` and `ii > 0`) is a declared capability
/// gap in this variant and is rejected on every call.
#[derive(Debug, Clone)]
pub struct VariableDose<F, I> {
    diffeq: F,
    ii: f64,
    cmt: usize,
    integrator: I,
}

impl<F, I> VariableDose<F, I>
where
    F: DiffEq,
    I: Integrator,
{
    /// Create a new variable-dose residual system
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
        y: &[S],
        dat: &[f64],
        dat_int: &[i32],
    ) -> Result<V<S>, SteadySolError> {
        let n = x.len();
        check_compartment(self.cmt, n)?;
        let data = VariableDoseData::new(dat, n)?;
        let (amt, parms) = match y.split_last() {
            Some((amt, parms)) => (*amt, parms),
            None => return Err(SteadySolError::MissingDoseAmount),
        };
        let rate = data.rate_into(self.cmt);
        let regime = Regime::classify(rate, self.ii);
        trace!(
            ?regime,
            ii = self.ii,
            cmt = self.cmt,
            "variable-dose steady-state residual"
        );

        match regime {
            Regime::Bolus => {
                let mut dosed = x.clone();
                dosed[self.cmt - 1] += amt;
                let pred = single_state(self.integrator.integrate(
                    &self.diffeq,
                    dosed,
                    0.0,
                    &[self.ii],
                    parms,
                    data.rates(),
                    dat_int,
                )?)?;
                Ok(trough_residual(&x, &pred))
            }
            Regime::TruncatedInfusion => Err(SteadySolError::UnsupportedVariableDoseInfusion),
            Regime::ConstantInfusion => {
                self.diffeq
                    .derivative(0.0, &x, parms, data.rates(), dat_int, 0)
            }
        }
    }
}

impl<F, I> SteadyStateSystem for VariableDose<F, I>
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::residual::FixedDose;
    use approx::assert_abs_diff_eq;
    use nalgebra::{dvector, DVector};

    struct OneCmtElim;

    impl DiffEq for OneCmtElim {
        fn derivative<S: DoseScalar>(
            &self,
            _t: f64,
            x: &V<S>,
            p: &[S],
            rateiv: &[f64],
            _dat_int: &[i32],
            _flag: i32,
        ) -> Result<V<S>, SteadySolError> {
            let ke = p[0];
            Ok(DVector::from_fn(x.len(), |i, _| {
                S::from(rateiv[i]) - ke * x[i]
            }))
        }
    }

    struct OneCmtExp;

    impl Integrator for OneCmtExp {
        fn integrate<S: DoseScalar, F: DiffEq>(
            &self,
            _f: &F,
            x0: V<S>,
            t0: f64,
            ts: &[f64],
            p: &[S],
            rateiv: &[f64],
            _dat_int: &[i32],
        ) -> Result<Vec<V<S>>, SteadySolError> {
            let ke = p[0];
            Ok(ts
                .iter()
                .map(|&t| {
                    let decay = (ke * (t0 - t)).exp();
                    DVector::from_fn(x0.len(), |i, _| {
                        x0[i] * decay + S::from(rateiv[i]) / ke * (S::from(1.0) - decay)
                    })
                })
                .collect())
        }
    }

    #[test]
    fn truncated_infusion_is_always_rejected() {
        let sys = VariableDose::new(OneCmtElim, 12.0, 1, OneCmtExp);
        for x0 in [0.5, 4.0, 12.0] {
            let err = sys
                .residual(&dvector![x0], &dvector![0.3, 100.0], &[2.0], &[])
                .unwrap_err();
            assert!(matches!(
                err,
                SteadySolError::UnsupportedVariableDoseInfusion
            ));
        }
    }

    #[test]
    fn bolus_agrees_with_the_fixed_dose_variant() {
        let ke = 0.3;
        let ii = 12.0;
        let amt = 100.0;
        let x = dvector![7.5];

        let vd = VariableDose::new(OneCmtElim, ii, 1, OneCmtExp);
        let dd = FixedDose::new(OneCmtElim, ii, 1, OneCmtExp);

        let from_vd = vd.residual(&x, &dvector![ke, amt], &[0.0], &[]).unwrap();
        let from_dd = dd.residual(&x, &dvector![ke], &[0.0, amt], &[]).unwrap();
        assert_eq!(from_vd[0].to_bits(), from_dd[0].to_bits());
    }

    #[test]
    fn constant_infusion_steady_state_has_zero_derivative() {
        let ke = 0.4;
        let rate = 3.0;
        let sys = VariableDose::new(OneCmtElim, 0.0, 1, OneCmtExp);

        let res = sys
            .residual(&dvector![rate / ke], &dvector![ke, 50.0], &[rate], &[])
            .unwrap();
        assert_abs_diff_eq!(res[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_parameter_vector_is_rejected() {
        let sys = VariableDose::new(OneCmtElim, 12.0, 1, OneCmtExp);
        let y: DVector<f64> = DVector::zeros(0);
        let err = sys.residual(&dvector![1.0], &y, &[0.0], &[]).unwrap_err();
        assert!(matches!(err, SteadySolError::MissingDoseAmount));
    }
}
