//! Command line front end for the game library

use clap::Parser;
use cli::{handle_cli, Cli};
use psxdeck::config::{GlobalConfig, CONFIG_LOCATION};
use std::{error::Error, ops::Deref};
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    tracing::info!("psxdeck v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config_location = cli
        .config
        .clone()
        .unwrap_or_else(|| CONFIG_LOCATION.deref().clone());
    let global_config = GlobalConfig::load_or_default(&config_location);

    // Storage calls are awaited one after another on this thread, nothing runs in parallel
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(handle_cli(cli.action, &global_config))
}
