//! Normalization of the smoothness and occlusion weights into one set of
//! non-negative integers over a shared denominator.
//!
//! The flow is strictly one way: each decoded fraction is absorbed with
//! [`CostState::rescale`], missing weights are filled in by
//! [`CostState::derive_defaults`], and [`CostState::reduce`] shrinks the
//! integers before they are handed to the solver.

mod derive;
mod reduce;
mod rescale;

pub use derive::lambda_from_occlusion;
pub use reduce::gcd;
pub use rescale::TrackedField;

use crate::error::Result;
use crate::params::{CostParameters, NormalizedParameters};
use crate::solver::StereoSolver;

/// Cost parameters together with the master lambda numerator.
///
/// The lambda numerator shares `params.denominator` with the other weights
/// until the final reduction gives it its own denominator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostState {
    pub params: CostParameters,
    pub lambda: i64,
}

impl CostState {
    pub fn new(params: CostParameters) -> Self {
        Self { params, lambda: -1 }
    }

    pub fn lambda_is_set(&self) -> bool {
        self.lambda >= 0
    }

    /// Derive missing weights, reduce, and push the result to `solver`.
    pub fn finalize(mut self, solver: &mut dyn StereoSolver) -> Result<NormalizedParameters> {
        self.derive_defaults(solver)?;
        self.reduce(solver)
    }
}

impl Default for CostState {
    fn default() -> Self {
        Self::new(CostParameters::default())
    }
}
