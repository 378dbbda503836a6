//! Funding-rate scanner service - Entry Point

use anyhow::Result;
use clap::Parser;
use fundscan_server::{resolve_config_path, AppConfig, Application};
use std::path::Path;
use tracing::{info, warn};

/// Perpetual funding-rate ranking service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via FUNDSCAN_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Determine config path: CLI arg > FUNDSCAN_CONFIG env var > default
    let config_path = resolve_config_path(args.config);
    let config = AppConfig::load(&config_path)?;

    fundscan_telemetry::init_logging(&config.telemetry.log_level)?;

    info!("Starting fundscan server v{}", env!("CARGO_PKG_VERSION"));
    if Path::new(&config_path).exists() {
        info!(config_path = %config_path, "Configuration loaded");
    } else {
        warn!(config_path = %config_path, "Config file not found, using defaults");
    }

    let app = Application::new(config)?;
    app.run().await?;

    Ok(())
}
