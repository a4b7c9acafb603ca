//! Seam between parameter preparation and the energy minimizer.
//!
//! The normalization engine only needs to push parameters, ask for an
//! automatic occlusion cost and, once everything is fixed, run the
//! optimization and save its result.

use std::path::Path;

use rand::RngCore;

use crate::error::Result;
use crate::params::CostParameters;

mod cost;
pub mod local;

pub use local::LocalMatcher;

/// Progress of one optimization iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IterationReport {
    /// 1-based iteration index.
    pub iteration: u32,
    /// Total energy after the iteration, in units of `1 / denominator`.
    pub energy: i64,
    /// Whether the iteration changed any label.
    pub changed: bool,
}

/// Integer-weighted stereo energy minimizer.
pub trait StereoSolver {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Replace the cost parameters used by the solver.
    fn set_parameters(&mut self, params: &CostParameters);

    /// Estimate an occlusion cost from image statistics.
    ///
    /// Only valid after [`StereoSolver::set_parameters`]. The value is in
    /// plain intensity units, independent of the denominator.
    fn estimate_occlusion_cost(&self) -> Result<f32>;

    /// Set the inclusive range of disparities searched.
    fn set_disparity_range(&mut self, min: i32, max: i32);

    /// Run the optimization to completion.
    ///
    /// `rng` drives the label order when randomization is enabled.
    fn optimize(
        &mut self,
        rng: &mut dyn RngCore,
        on_iteration: &mut dyn FnMut(IterationReport),
    ) -> Result<()>;

    /// Save the raw disparity map of the left image.
    fn save_disparity(&self, path: &Path) -> Result<()>;

    /// Save a disparity map scaled to 8 bits for display. With
    /// `brighter_far` larger disparities are brighter.
    fn save_scaled_disparity(&self, path: &Path, brighter_far: bool) -> Result<()>;
}
