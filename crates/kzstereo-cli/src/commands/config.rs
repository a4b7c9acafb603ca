use std::path::Path;

use anyhow::{Context, Result};
use kzstereo_core::pipeline::config::MatchConfig;

/// Read a TOML config file, or the empty config when no path is given.
pub fn load(path: Option<&Path>) -> Result<MatchConfig> {
    let Some(path) = path else {
        return Ok(MatchConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))
}

/// Render a config as TOML.
pub fn render(config: &MatchConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
