use serde::{Deserialize, Serialize};

use crate::params::{CostParameters, DataCost};

use super::FractionInputs;

/// Weight as written in a config file: a bare integer or a fraction token
/// such as `"5/2"` or `"AUTO"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightSetting {
    Integer(i64),
    Token(String),
}

impl WeightSetting {
    pub fn to_token(&self) -> String {
        match self {
            Self::Integer(v) => v.to_string(),
            Self::Token(s) => s.clone(),
        }
    }
}

/// Defaults loaded from a TOML file. Command-line flags take precedence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_cost: Option<DataCost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_threshold: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lambda: Option<WeightSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lambda1: Option<WeightSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lambda2: Option<WeightSetting>,
    /// Occlusion cost K.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<WeightSetting>,
    /// Seed of the label-order generator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl MatchConfig {
    /// Cost parameters with the file's scalar settings applied over the defaults.
    pub fn cost_parameters(&self) -> CostParameters {
        let mut params = CostParameters::default();
        if let Some(data_cost) = self.data_cost {
            params.data_cost = data_cost;
        }
        if let Some(threshold) = self.edge_threshold {
            params.edge_threshold = threshold;
        }
        if let Some(iterations) = self.max_iterations {
            params.max_iterations = iterations;
        }
        if let Some(randomize) = self.randomize {
            params.randomize_every_iteration = randomize;
        }
        params
    }

    pub fn fraction_inputs(&self) -> FractionInputs {
        FractionInputs {
            lambda: self.lambda.as_ref().map(WeightSetting::to_token),
            lambda1: self.lambda1.as_ref().map(WeightSetting::to_token),
            lambda2: self.lambda2.as_ref().map(WeightSetting::to_token),
            occlusion_cost: self.k.as_ref().map(WeightSetting::to_token),
        }
    }
}
