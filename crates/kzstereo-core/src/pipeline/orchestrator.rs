use std::path::PathBuf;

use rand::RngCore;
use tracing::info;

use crate::error::{KzError, Result};
use crate::fraction::parse_fraction;
use crate::normalize::{CostState, TrackedField};
use crate::params::CostParameters;
use crate::solver::{IterationReport, StereoSolver};

/// Raw fraction tokens supplied for each weight, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FractionInputs {
    pub lambda: Option<String>,
    pub lambda1: Option<String>,
    pub lambda2: Option<String>,
    pub occlusion_cost: Option<String>,
}

impl FractionInputs {
    /// Tokens in the order they are absorbed.
    fn ordered(&self) -> [(TrackedField, Option<&str>); 4] {
        [
            (TrackedField::Lambda, self.lambda.as_deref()),
            (TrackedField::Lambda1, self.lambda1.as_deref()),
            (TrackedField::Lambda2, self.lambda2.as_deref()),
            (TrackedField::OcclusionCost, self.occlusion_cost.as_deref()),
        ]
    }
}

/// Decode every supplied token and absorb it into the common denominator,
/// in the order lambda, lambda1, lambda2, K. Empty tokens count as absent.
///
/// Stops at the first token that fails to decode.
pub fn prepare(params: CostParameters, inputs: &FractionInputs) -> Result<CostState> {
    let mut state = CostState::new(params);
    for (field, token) in inputs.ordered() {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            continue;
        };
        let fraction = parse_fraction(token)?;
        state.rescale(field, fraction)?;
    }
    Ok(state)
}

/// Parse `dMin` / `dMax`. The whole token must be an integer.
pub fn parse_disparity(token: &str) -> Result<i32> {
    token
        .parse::<i32>()
        .map_err(|_| KzError::InvalidArgument("Error reading dMin or dMax".into()))
}

/// Where to save the result of the optimization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchOutputs {
    /// Raw disparity map.
    pub disparity: Option<PathBuf>,
    /// Disparity map scaled to 8 bits for display.
    pub scaled: Option<PathBuf>,
}

impl MatchOutputs {
    pub fn is_empty(&self) -> bool {
        self.disparity.is_none() && self.scaled.is_none()
    }
}

/// Optimize with the parameters already pushed to `solver`, then save.
pub fn run_matching(
    solver: &mut dyn StereoSolver,
    outputs: &MatchOutputs,
    rng: &mut dyn RngCore,
    on_iteration: &mut dyn FnMut(IterationReport),
) -> Result<()> {
    info!(solver = solver.name(), "Running optimization");
    solver.optimize(rng, on_iteration)?;

    if let Some(ref path) = outputs.disparity {
        solver.save_disparity(path)?;
        info!(path = %path.display(), "Saved disparity map");
    }
    if let Some(ref path) = outputs.scaled {
        solver.save_scaled_disparity(path, false)?;
        info!(path = %path.display(), "Saved scaled disparity map");
    }
    Ok(())
}
