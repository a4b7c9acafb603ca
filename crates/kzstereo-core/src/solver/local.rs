//! Greedy baseline matcher.
//!
//! Minimizes the same integer energy as the graph-cut optimizer (data term,
//! occlusion cost K, Potts smoothness split by intensity edges) but with
//! per-pixel label switches instead of expansion moves. Results are local
//! minima; it exists so the front end can run end to end without the
//! graph-cut backend.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::debug;

use crate::consts::DATA_COST_CUTOFF;
use crate::disparity::DisparityMap;
use crate::error::{KzError, Result};
use crate::io::image_io::{self, StereoPair};
use crate::params::CostParameters;

use super::cost::{data_penalty, estimate_occlusion_cost, matched_column, reachable_range};
use super::{IterationReport, StereoSolver};

const NEIGHBOURS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub struct LocalMatcher {
    pair: StereoPair,
    params: Option<CostParameters>,
    map: DisparityMap,
}

impl LocalMatcher {
    pub fn new(pair: StereoPair) -> Self {
        let map = DisparityMap::occluded(pair.left.height(), pair.left.width(), 0, 0);
        Self {
            pair,
            params: None,
            map,
        }
    }

    pub fn disparity_map(&self) -> &DisparityMap {
        &self.map
    }

    pub fn parameters(&self) -> Option<&CostParameters> {
        self.params.as_ref()
    }

    fn require_params(&self) -> Result<&CostParameters> {
        self.params
            .as_ref()
            .ok_or_else(|| KzError::Solver("parameters have not been set".into()))
    }

    /// Fail with [`KzError::Overflow`] unless the largest total energy of
    /// this image fits in `i64`. Every sum below stays under that bound.
    fn check_energy_bound(&self, p: &CostParameters) -> Result<i64> {
        let pixels = i64::try_from(self.map.height() * self.map.width())
            .map_err(|_| KzError::Overflow)?;
        let data = p
            .denominator
            .checked_mul(DATA_COST_CUTOFF)
            .ok_or(KzError::Overflow)?
            .max(p.occlusion_cost);
        let smooth = p.lambda1.max(p.lambda2);
        smooth
            .checked_mul(NEIGHBOURS.len() as i64)
            .and_then(|s| s.checked_add(data))
            .and_then(|per_pixel| per_pixel.checked_mul(pixels.max(1)))
            .ok_or(KzError::Overflow)
    }

    /// Data term of `label` at `(row, col)`, `None` if the match falls
    /// outside the right image.
    fn data_term(&self, p: &CostParameters, row: usize, col: usize, label: Option<i32>) -> Option<i64> {
        match label {
            None => Some(p.occlusion_cost),
            Some(d) => {
                let col_right = matched_column(self.pair.left.width(), col, d)?;
                Some(p.denominator * data_penalty(&self.pair, p.data_cost, row, col, col_right))
            }
        }
    }

    /// `lambda1` between neighbours of similar intensity, `lambda2` across an edge.
    fn smoothness(&self, p: &CostParameters, a: (usize, usize), b: (usize, usize)) -> i64 {
        let left = &self.pair.left.data;
        let diff = (0..self.pair.left.channels())
            .map(|c| (left[[a.0, a.1, c]] as i32 - left[[b.0, b.1, c]] as i32).abs())
            .max()
            .unwrap_or(0);
        if diff < p.edge_threshold {
            p.lambda1
        } else {
            p.lambda2
        }
    }

    fn neighbours(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (h, w) = (self.map.height() as isize, self.map.width() as isize);
        NEIGHBOURS.iter().filter_map(move |&(dr, dc)| {
            let (r, c) = (row as isize + dr, col as isize + dc);
            (r >= 0 && r < h && c >= 0 && c < w).then_some((r as usize, c as usize))
        })
    }

    /// Energy terms involving `(row, col)` if it took `label`.
    fn local_energy(&self, p: &CostParameters, row: usize, col: usize, label: Option<i32>) -> Option<i64> {
        let mut energy = self.data_term(p, row, col, label)?;
        for q in self.neighbours(row, col) {
            if self.map.data[q] != label {
                energy += self.smoothness(p, (row, col), q);
            }
        }
        Some(energy)
    }

    fn total_energy(&self, p: &CostParameters) -> i64 {
        let mut energy = 0;
        for ((row, col), &label) in self.map.data.indexed_iter() {
            energy += self.data_term(p, row, col, label).unwrap_or(0);
            // Right and down neighbours only, so each pair counts once.
            for q in [(row + 1, col), (row, col + 1)] {
                if q.0 < self.map.height() && q.1 < self.map.width() && self.map.data[q] != label {
                    energy += self.smoothness(p, (row, col), q);
                }
            }
        }
        energy
    }

    /// Switch every pixel to `label` where that lowers its local energy.
    fn sweep(&mut self, p: &CostParameters, label: Option<i32>) -> bool {
        let mut changed = false;
        for row in 0..self.map.height() {
            for col in 0..self.map.width() {
                let current = self.map.data[[row, col]];
                if current == label {
                    continue;
                }
                let Some(candidate) = self.local_energy(p, row, col, label) else {
                    continue;
                };
                let existing = self.local_energy(p, row, col, current).unwrap_or(i64::MAX);
                if candidate < existing {
                    self.map.data[[row, col]] = label;
                    changed = true;
                }
            }
        }
        changed
    }
}

impl StereoSolver for LocalMatcher {
    fn name(&self) -> &str {
        "local"
    }

    fn set_parameters(&mut self, params: &CostParameters) {
        self.params = Some(params.clone());
    }

    fn estimate_occlusion_cost(&self) -> Result<f32> {
        let p = self.require_params()?;
        estimate_occlusion_cost(&self.pair, p.data_cost, self.map.min, self.map.max)
    }

    fn set_disparity_range(&mut self, min: i32, max: i32) {
        self.map = DisparityMap::occluded(self.map.height(), self.map.width(), min, max);
    }

    fn optimize(
        &mut self,
        rng: &mut dyn RngCore,
        on_iteration: &mut dyn FnMut(IterationReport),
    ) -> Result<()> {
        let p = self.require_params()?.clone();
        p.validate()?;
        let (min, max) = (self.map.min, self.map.max);
        if max < min {
            return Err(KzError::Solver(format!(
                "empty disparity range [{min}, {max}]"
            )));
        }

        let bound = self.check_energy_bound(&p)?;
        debug!(bound, "Energy bound fits");

        self.map = DisparityMap::occluded(self.map.height(), self.map.width(), min, max);
        // Labels that match no column could never be chosen.
        let mut order: Vec<i32> = match reachable_range(self.map.width(), min, max) {
            Some((lo, hi)) => (lo..=hi).collect(),
            None => Vec::new(),
        };

        for iteration in 1..=p.max_iterations {
            if iteration == 1 || p.randomize_every_iteration {
                order.shuffle(&mut *rng);
            }
            let mut changed = false;
            for &d in &order {
                changed |= self.sweep(&p, Some(d));
            }
            changed |= self.sweep(&p, None);

            let energy = self.total_energy(&p);
            debug!(
                iteration,
                energy,
                changed,
                occluded = self.map.occluded_count(),
                "Finished iteration"
            );
            on_iteration(IterationReport {
                iteration,
                energy,
                changed,
            });
            if !changed {
                break;
            }
        }
        Ok(())
    }

    fn save_disparity(&self, path: &Path) -> Result<()> {
        image_io::save_disparity(&self.map, path)
    }

    fn save_scaled_disparity(&self, path: &Path, brighter_far: bool) -> Result<()> {
        image_io::save_scaled_disparity(&self.map, path, brighter_far)
    }
}
