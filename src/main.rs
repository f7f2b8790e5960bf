mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use tradecast::config::{Config, EnvConfig};
use tradecast::SeriesDatabase;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let (config, found) = Config::load_or_default(&cli.config)?;

    // Initialize tracing, RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.monitoring.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if !found {
        tracing::warn!("Config file {} not found, using defaults", cli.config);
    }
    let env_config = EnvConfig::load();

    let database_path = cli
        .database
        .clone()
        .unwrap_or_else(|| config.system.database_path.clone());
    let mut db = SeriesDatabase::new(&database_path)?;

    commands::run(cli.command, &config, &env_config, &mut db).await
}
