use tracing::info;

use crate::error::Result;
use crate::params::{Lambda, NormalizedParameters};
use crate::solver::StereoSolver;

use super::CostState;

impl CostState {
    /// Divide the shared weights by their gcd, push them to `solver`, and
    /// reduce the lambda fraction on its own.
    ///
    /// Lambda keeps the denominator that was in force when it was last set,
    /// so its reduction is independent of the shared one.
    pub fn reduce(mut self, solver: &mut dyn StereoSolver) -> Result<NormalizedParameters> {
        self.params.validate()?;

        let p = &mut self.params;
        let denominator_lambda = p.denominator;
        let g = gcd(
            p.occlusion_cost,
            gcd(p.lambda1, gcd(p.lambda2, p.denominator)),
        );
        if g > 1 {
            p.occlusion_cost /= g;
            p.lambda1 /= g;
            p.lambda2 /= g;
            p.denominator /= g;
        }
        solver.set_parameters(p);

        let mut lambda = Lambda {
            value: self.lambda,
            denominator: denominator_lambda,
        };
        let g2 = gcd(lambda.value, lambda.denominator);
        if g2 > 1 {
            lambda.value /= g2;
            lambda.denominator /= g2;
        }

        info!(
            k = self.params.occlusion_cost,
            lambda1 = self.params.lambda1,
            lambda2 = self.params.lambda2,
            denominator = self.params.denominator,
            %lambda,
            "Reduced cost parameters"
        );
        Ok(NormalizedParameters {
            params: self.params,
            lambda,
        })
    }
}

/// Greatest common divisor, always non-negative. `gcd(0, 0) == 0`.
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a as i64
}
