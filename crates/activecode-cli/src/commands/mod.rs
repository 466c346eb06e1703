pub mod build;
pub mod run;

use std::path::Path;

use activecode::ActiveCodeConfig;
use anyhow::{Context, Result};

/// Reads the widget configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<ActiveCodeConfig> {
    let Some(path) = path else {
        return Ok(ActiveCodeConfig::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = ActiveCodeConfig::from_toml_str(&source)
        .with_context(|| format!("invalid config {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}
