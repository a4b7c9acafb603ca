pub mod config;
mod orchestrator;

pub use orchestrator::{parse_disparity, prepare, run_matching, FractionInputs, MatchOutputs};
