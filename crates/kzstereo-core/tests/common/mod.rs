#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use ndarray::Array3;
use rand::RngCore;

use kzstereo_core::error::{KzError, Result};
use kzstereo_core::io::image_io::{StereoImage, StereoPair};
use kzstereo_core::params::CostParameters;
use kzstereo_core::solver::{IterationReport, StereoSolver};

/// One call made on a [`RecordingSolver`].
#[derive(Clone, Debug, PartialEq)]
pub enum SolverCall {
    SetParameters(CostParameters),
    EstimateOcclusionCost,
    SetDisparityRange(i32, i32),
    Optimize,
    SaveDisparity(PathBuf),
    SaveScaledDisparity(PathBuf, bool),
}

/// Solver double that records every call and returns a fixed K estimate.
pub struct RecordingSolver {
    pub estimate: f32,
    calls: RefCell<Vec<SolverCall>>,
}

impl RecordingSolver {
    pub fn new(estimate: f32) -> Self {
        Self {
            estimate,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SolverCall> {
        self.calls.borrow().clone()
    }

    /// Parameters from every `set_parameters` call, in order.
    pub fn pushed(&self) -> Vec<CostParameters> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                SolverCall::SetParameters(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn estimated(&self) -> bool {
        self.calls
            .borrow()
            .contains(&SolverCall::EstimateOcclusionCost)
    }

    fn record(&self, call: SolverCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl StereoSolver for RecordingSolver {
    fn name(&self) -> &str {
        "recording"
    }

    fn set_parameters(&mut self, params: &CostParameters) {
        self.record(SolverCall::SetParameters(params.clone()));
    }

    fn estimate_occlusion_cost(&self) -> Result<f32> {
        if self.pushed().is_empty() {
            return Err(KzError::Solver("parameters have not been set".into()));
        }
        self.record(SolverCall::EstimateOcclusionCost);
        Ok(self.estimate)
    }

    fn set_disparity_range(&mut self, min: i32, max: i32) {
        self.record(SolverCall::SetDisparityRange(min, max));
    }

    fn optimize(
        &mut self,
        _rng: &mut dyn RngCore,
        on_iteration: &mut dyn FnMut(IterationReport),
    ) -> Result<()> {
        self.record(SolverCall::Optimize);
        on_iteration(IterationReport {
            iteration: 1,
            energy: 0,
            changed: false,
        });
        Ok(())
    }

    fn save_disparity(&self, path: &Path) -> Result<()> {
        self.record(SolverCall::SaveDisparity(path.to_path_buf()));
        Ok(())
    }

    fn save_scaled_disparity(&self, path: &Path, brighter_far: bool) -> Result<()> {
        self.record(SolverCall::SaveScaledDisparity(
            path.to_path_buf(),
            brighter_far,
        ));
        Ok(())
    }
}

/// Single-channel image from row-major values.
pub fn gray_image(width: usize, height: usize, values: &[u8]) -> StereoImage {
    let data = Array3::from_shape_vec((height, width, 1), values.to_vec()).expect("shape");
    StereoImage::new(data)
}

/// Texture used by [`shifted_pair`]. Distinct along a row for `x < 256`, with
/// a step of at least 17 between columns and 3 between rows.
pub fn texture(x: usize, y: usize) -> u8 {
    ((x * 17 + y * 3) % 256) as u8
}

/// Gray pair whose right view is the left one shifted by `shift` columns,
/// so the true disparity is `-shift` wherever it is defined.
pub fn shifted_pair(width: usize, height: usize, shift: usize) -> StereoPair {
    let mut left = Vec::with_capacity(width * height);
    let mut right = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            left.push(texture(x, y));
            right.push(texture(x + shift, y));
        }
    }
    StereoPair::new(
        gray_image(width, height, &left),
        gray_image(width, height, &right),
    )
    .expect("same size")
}
