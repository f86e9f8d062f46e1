use criterion::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::{dvector, DVector};
use steadysol::fetch_params;
use steadysol::prelude::residual::{FixedDose, SteadyStateSystem};
use steadysol::prelude::*;

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
        fetch_params!(p, ke);
        Ok(DVector::from_fn(x.len(), |i, _| {
            S::from(rateiv[i]) - ke * x[i]
        }))
    }
}

struct Rk4 {
    nsteps: usize,
}

impl Rk4 {
    fn stage<S: DoseScalar>(x: &V<S>, k: &V<S>, h: f64) -> V<S> {
        DVector::from_fn(x.len(), |i, _| x[i] + k[i] * h)
    }
}

impl Integrator for Rk4 {
    fn integrate<S: DoseScalar, F: DiffEq>(
        &self,
        f: &F,
        x0: V<S>,
        t0: f64,
        ts: &[f64],
        p: &[S],
        rateiv: &[f64],
        dat_int: &[i32],
    ) -> Result<Vec<V<S>>, SteadySolError> {
        let mut out = Vec::with_capacity(ts.len());
        for &tend in ts {
            let mut x = x0.clone();
            let mut t = t0;
            let h = (tend - t0) / self.nsteps as f64;
            for _ in 0..self.nsteps {
                let k1 = f.derivative(t, &x, p, rateiv, dat_int, 0)?;
                let k2 = f.derivative(t + 0.5 * h, &Self::stage(&x, &k1, 0.5 * h), p, rateiv, dat_int, 0)?;
                let k3 = f.derivative(t + 0.5 * h, &Self::stage(&x, &k2, 0.5 * h), p, rateiv, dat_int, 0)?;
                let k4 = f.derivative(t + h, &Self::stage(&x, &k3, h), p, rateiv, dat_int, 0)?;
                x = DVector::from_fn(x.len(), |i, _| {
                    x[i] + (k1[i] + (k2[i] + k3[i]) * 2.0 + k4[i]) * (h / 6.0)
                });
                t += h;
            }
            out.push(x);
        }
        Ok(out)
    }
}

fn bolus() {
    let sys = FixedDose::new(OneCmtElim, 12.0, 1, Rk4 { nsteps: 100 });
    black_box(sys.residual(&dvector![2.0], &dvector![0.3], &[0.0, 100.0], &[])).ok();
}

fn truncated_infusion() {
    let sys = FixedDose::new(OneCmtElim, 12.0, 1, Rk4 { nsteps: 100 });
    black_box(sys.residual(&dvector![3.0], &dvector![0.3], &[12.5, 50.0], &[])).ok();
}

fn constant_infusion() {
    let sys = FixedDose::new(OneCmtElim, 0.0, 1, Rk4 { nsteps: 100 });
    black_box(sys.residual(&dvector![6.5], &dvector![0.3], &[2.0, 0.0], &[])).ok();
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("ss_bolus", |b| b.iter(bolus));
    c.bench_function("ss_truncated_infusion", |b| b.iter(truncated_infusion));
    c.bench_function("ss_constant_infusion", |b| b.iter(constant_infusion));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
