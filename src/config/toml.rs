//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<SuiteConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<SuiteConfig> {
    let config: SuiteConfig =
        ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Build the suite configuration: TOML file (if any), then CLI flags on top
pub fn load_config(cli: &Cli) -> Result<SuiteConfig> {
    let base = match &cli.config {
        Some(path) => parse_toml_file(path)?,
        None => SuiteConfig::default(),
    };

    super::cli_convert::apply_cli(cli, base)
}
