//! Differentiable scalars and promotion rules
//!
//! Residual systems are written once, generically over a scalar that may or
//! may not carry first-order derivative information. Plain `f64` evaluation
//! and dual-number evaluation (via [`num_dual`]) share the same code path, so
//! sensitivities of the steady state with respect to model parameters stay
//! correct through conditional branches and nested simulation calls.

use std::fmt::{Debug, Display};

use nalgebra::DVector;
use num_dual::{Dual2_64, Dual64, DualNum};

/// Scalar type over which residual systems are evaluated.
///
/// Implemented by `f64` and by the dual-number types of [`num_dual`], which
/// supply the full elementary arithmetic a compartmental model needs.
pub trait DoseScalar:
    DualNum<f64> + From<f64> + Copy + PartialEq + Debug + Display + 'static
{
}

impl<T> DoseScalar for T where
    T: DualNum<f64> + From<f64> + Copy + PartialEq + Debug + Display + 'static
{
}

/// Combination of two scalar types into the least common type carrying the
/// derivative structure of both.
///
/// A state vector differentiated in `x` and a parameter vector differentiated
/// in `y` meet inside one residual evaluation; the residual's scalar type is
/// `<T0 as Promote<T1>>::Output`. Promotion only lifts representation: the
/// plain/plain combination is the identity and derivative payloads are never
/// altered.
pub trait Promote<R: DoseScalar>: DoseScalar {
    /// The promoted scalar type
    type Output: DoseScalar;

    /// Lift `self` into the promoted type
    fn lift(self) -> <Self as Promote<R>>::Output;

    /// Lift a right-hand scalar into the promoted type
    fn lift_rhs(rhs: R) -> <Self as Promote<R>>::Output;
}

impl Promote<f64> for f64 {
    type Output = f64;

    fn lift(self) -> f64 {
        self
    }

    fn lift_rhs(rhs: f64) -> f64 {
        rhs
    }
}

macro_rules! impl_promote {
    ($($dual:ty),+ $(,)?) => {
        $(
            impl Promote<$dual> for f64 {
                type Output = $dual;

                fn lift(self) -> $dual {
                    <$dual>::from(self)
                }

                fn lift_rhs(rhs: $dual) -> $dual {
                    rhs
                }
            }

            impl Promote<f64> for $dual {
                type Output = $dual;

                fn lift(self) -> $dual {
                    self
                }

                fn lift_rhs(rhs: f64) -> $dual {
                    <$dual>::from(rhs)
                }
            }

            impl Promote<$dual> for $dual {
                type Output = $dual;

                fn lift(self) -> $dual {
                    self
                }

                fn lift_rhs(rhs: $dual) -> $dual {
                    rhs
                }
            }
        )+
    };
}

impl_promote!(Dual64, Dual2_64);

/// Lift a left-hand vector into the promoted scalar type
pub fn lift_vector<L, R>(v: &DVector<L>) -> DVector<<L as Promote<R>>::Output>
where
    L: Promote<R>,
    R: DoseScalar,
{
    DVector::from_fn(v.len(), |i, _| v[i].lift())
}

/// Lift a right-hand vector into the promoted scalar type
pub fn lift_rhs_vector<L, R>(v: &DVector<R>) -> DVector<<L as Promote<R>>::Output>
where
    L: Promote<R>,
    R: DoseScalar,
{
    DVector::from_fn(v.len(), |i, _| L::lift_rhs(v[i]))
}
