use anyhow::Result;
use clap::Parser;

mod commands;
mod logging;
mod output;
mod settings;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = match &cli.command {
        Commands::Detect(args) => commands::detect::overrides(args),
        Commands::Config(_) => None,
    };
    let config = settings::load(cli.config.as_deref(), overrides)?;
    logging::init(&config.observability);

    match cli.command {
        Commands::Detect(args) => commands::detect::run(args, &config).await,
        Commands::Config(args) => commands::show_config::run(args, &config),
    }
}
