//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use tapfinder_core::config::{CliConfigOverrides, LayeredConfig};

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "tapfinder.toml";

/// Load layered configuration.
///
/// An explicit `--config` path must exist; the default file is optional.
pub fn load_config(path: Option<&Path>) -> Result<LayeredConfig> {
    let config = match path {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => LayeredConfig::with_defaults()
            .load_from_optional_file(DEFAULT_CONFIG_FILE)
            .context("Failed to load configuration file")?,
    };

    Ok(config.load_from_env())
}

/// Load layered configuration with CLI overrides
pub fn load_config_with_overrides(
    path: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let mut config = load_config(path)?;
    config.update_from_cli(overrides);
    Ok(config)
}
