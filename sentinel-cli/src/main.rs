//! ## sentinel-cli
//! **Terminal front end for the traffic telemetry engine**
//!
//! Streams the live feed and periodic snapshot summaries to stdout, stops on
//! Ctrl-C or after a fixed duration, and optionally exports the session log.

use clap::Parser;

mod commands;
mod render;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(run_args) => commands::run(run_args).await,
        Commands::Config(config_args) => commands::show_config(config_args),
    }
}
