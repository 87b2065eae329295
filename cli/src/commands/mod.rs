pub mod detect;
pub mod show_config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "neonomaly",
    author,
    version,
    about = "Neonomaly - metric anomaly detection",
    long_about = "Replays metric readings into an in-memory store and checks whether the \
                  latest reading is an outlier against its trailing window.\n\nSettings come \
                  from defaults, an optional config file, NM_* environment variables and \
                  flags, in increasing priority."
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (.toml, .yaml or .yml)")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Replay a readings file and run anomaly detection on the last reading"
    )]
    Detect(detect::DetectArgs),

    #[command(about = "Print the effective configuration as TOML")]
    Config(show_config::ConfigArgs),
}
