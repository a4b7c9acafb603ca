use tracing::{debug, info};

use crate::consts::{LAMBDA1_FACTOR, LAMBDA2_FACTOR, MIN_SCALED_LAMBDA, OCCLUSION_TO_LAMBDA};
use crate::error::{KzError, Result};
use crate::fraction::Fraction;
use crate::solver::StereoSolver;

use super::rescale::checked_mul;
use super::{CostState, TrackedField};

impl CostState {
    /// Fill in every weight that is still unset.
    ///
    /// An unset lambda is derived from the occlusion cost as `K/5`, asking
    /// `solver` for an estimate of K when it is not positive. Then unset K,
    /// lambda1 and lambda2 default to `5`, `3` and `1` times lambda, in the
    /// current common denominator.
    pub fn derive_defaults(&mut self, solver: &mut dyn StereoSolver) -> Result<()> {
        if !self.lambda_is_set() {
            let k = self.occlusion_cost_value(solver)?;
            let (lambda, denominator) = lambda_from_occlusion(k)?;
            info!(k, lambda, denominator, "Derived lambda from occlusion cost");
            self.rescale(TrackedField::Lambda, Fraction::new(lambda, denominator))?;
        }

        let lambda = self.lambda;
        let p = &mut self.params;
        if p.occlusion_cost < 0 {
            p.occlusion_cost = checked_mul(OCCLUSION_TO_LAMBDA, lambda)?;
        }
        if p.lambda1 < 0 {
            p.lambda1 = checked_mul(LAMBDA1_FACTOR, lambda)?;
        }
        if p.lambda2 < 0 {
            p.lambda2 = checked_mul(LAMBDA2_FACTOR, lambda)?;
        }
        debug!(
            lambda,
            lambda1 = p.lambda1,
            lambda2 = p.lambda2,
            k = p.occlusion_cost,
            denominator = p.denominator,
            "Filled in default weights"
        );
        Ok(())
    }

    /// K as a real number, estimated by the solver when not positive.
    fn occlusion_cost_value(&self, solver: &mut dyn StereoSolver) -> Result<f32> {
        if self.params.occlusion_cost <= 0 {
            solver.set_parameters(&self.params);
            let k = solver.estimate_occlusion_cost()?;
            info!(k, solver = solver.name(), "Estimated occlusion cost");
            Ok(k)
        } else {
            Ok(self.params.occlusion_cost as f32 / self.params.denominator as f32)
        }
    }
}

/// Turn an occlusion cost into `lambda / denominator ≈ k / 5`.
///
/// The denominator is the smallest power of two bringing `k / 5` to at
/// least 3 before rounding half up.
pub fn lambda_from_occlusion(k: f32) -> Result<(i64, i64)> {
    if !k.is_finite() || k <= 0.0 {
        return Err(KzError::DegenerateOcclusionCost(k));
    }

    let mut target = k / OCCLUSION_TO_LAMBDA as f32;
    let mut denominator: i64 = 1;
    while target < MIN_SCALED_LAMBDA {
        target *= 2.0;
        denominator = checked_mul(denominator, 2)?;
    }
    Ok(((target + 0.5) as i64, denominator))
}
