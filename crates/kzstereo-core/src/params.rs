use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_EDGE_THRESHOLD, DEFAULT_MAX_ITERATIONS};
use crate::error::{KzError, Result};
use crate::fraction::write_fraction;

/// Distance used to compare pixel intensities in the data term.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataCost {
    L1,
    #[default]
    L2,
}

impl fmt::Display for DataCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
        }
    }
}

impl FromStr for DataCost {
    type Err = KzError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "L1" => Ok(Self::L1),
            "L2" => Ok(Self::L2),
            _ => Err(KzError::InvalidArgument(
                "The cost parameter must be 'L1' or 'L2'".into(),
            )),
        }
    }
}

/// Integer weights handed to the energy minimizer.
///
/// `lambda1`, `lambda2` and `occlusion_cost` are all expressed in units of
/// `1 / denominator`. A negative weight means it has not been set yet and
/// will be derived from lambda.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostParameters {
    pub data_cost: DataCost,
    pub denominator: i64,
    pub edge_threshold: i32,
    /// Smoothness cost between neighbours not separated by an edge.
    pub lambda1: i64,
    /// Smoothness cost between neighbours separated by an edge.
    pub lambda2: i64,
    /// Occlusion cost K.
    pub occlusion_cost: i64,
    pub max_iterations: u32,
    pub randomize_every_iteration: bool,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            data_cost: DataCost::L2,
            denominator: 1,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            lambda1: -1,
            lambda2: -1,
            occlusion_cost: -1,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            randomize_every_iteration: false,
        }
    }
}

impl CostParameters {
    /// Check the weights are usable by a solver.
    pub fn validate(&self) -> Result<()> {
        if self.denominator < 1 {
            return Err(KzError::InvalidParameters(format!(
                "denominator must be at least 1, got {}",
                self.denominator
            )));
        }
        for (name, value) in [
            ("lambda1", self.lambda1),
            ("lambda2", self.lambda2),
            ("K", self.occlusion_cost),
        ] {
            if value < 0 {
                return Err(KzError::InvalidParameters(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Master smoothness weight `value / denominator`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lambda {
    pub value: i64,
    pub denominator: i64,
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fraction(f, self.value, self.denominator)
    }
}

/// Fully reduced parameters, ready for the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedParameters {
    pub params: CostParameters,
    pub lambda: Lambda,
}

impl NormalizedParameters {
    /// `K=<value>` or `K=<num>/<den>`.
    pub fn occlusion_line(&self) -> String {
        if self.params.denominator == 1 {
            format!("K={}", self.params.occlusion_cost)
        } else {
            format!(
                "K={}/{}",
                self.params.occlusion_cost, self.params.denominator
            )
        }
    }

    /// `lambda=<value>` or `lambda=<num>/<den>`.
    pub fn lambda_line(&self) -> String {
        format!("lambda={}", self.lambda)
    }
}
