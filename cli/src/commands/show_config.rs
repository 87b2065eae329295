use anyhow::{Context, Result};
use clap::Args;
use config::Config;

#[derive(Args)]
pub struct ConfigArgs {}

pub fn run(_args: ConfigArgs, config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("rendering configuration")?;
    print!("{rendered}");
    Ok(())
}
