pub mod data;
pub mod error;
pub mod residual;
pub mod scalar;
pub mod simulator;

pub use crate::data::{FixedDoseData, LinOde, VariableDoseData};
pub use crate::residual::{FixedDose, Regime, SteadyStateSystem, VariableDose};
pub use crate::scalar::{lift_rhs_vector, lift_vector, DoseScalar, Promote};
pub use crate::simulator::{DiffEq, Integrator, V};
pub use error::SteadySolError;
pub use nalgebra::{dmatrix, dvector};

pub mod prelude {
    pub mod data {
        pub use crate::data::{FixedDoseData, LinOde, VariableDoseData};
    }
    pub mod residual {
        pub use crate::residual::{FixedDose, Regime, SteadyStateSystem, VariableDose};
    }

    pub use crate::error::SteadySolError;
    pub use crate::scalar::{lift_rhs_vector, lift_vector, DoseScalar, Promote};
    pub use crate::simulator::{DiffEq, Integrator, V};

    /// Unpack positional model parameters inside a derivative function.
    ///
    /// Works for any scalar the parameter slice carries:
    /// ```ignore
    /// use steadysol::*;
    /// fetch_params!(p, ka, ke, v);
    /// ```
    #[macro_export]
    macro_rules! fetch_params {
        ($p:expr, $($name:ident),*) => {
            let p = $p;
            let mut idx = 0;
            $(
                #[allow(unused_mut)]
                let mut $name = p[idx];
                idx += 1;
            )*
            let _ = idx; // Consume idx to avoid unused_assignments warning
        };
    }
}
