//! Effective configuration: defaults, file, environment, then flags.

use anyhow::{Context, Result};
use config::{Config, ConfigLayer, load_from_env, load_from_file, merge_configs, validate};
use std::path::Path;

pub fn load(path: Option<&Path>, cli_overrides: Option<ConfigLayer>) -> Result<Config> {
    let from_file = match path {
        Some(path) => load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ConfigLayer::default(),
    };
    let from_env = load_from_env().context("reading NM_* environment")?;

    let config = merge_configs(Config::default(), from_file, from_env, cli_overrides);
    validate(&config).context("invalid configuration")?;
    Ok(config)
}
