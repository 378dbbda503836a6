//! One-shot ranking: fetch, rank and print a table, then exit.
//!
//! Bypasses the cache and the persisted document. Exits with status 1 when
//! the refresh fails.

use anyhow::Result;
use clap::Parser;
use fundscan_server::{build_pipeline, report, resolve_config_path, AppConfig};
use tracing::error;

/// Print the current top coins by annualized funding rate
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via FUNDSCAN_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the number of coins shown
    #[arg(long)]
    top_n: Option<usize>,

    /// Override the funding history lookback in days
    #[arg(long)]
    days_back: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(&resolve_config_path(args.config))?;
    if let Some(top_n) = args.top_n {
        config.ranking.top_n = top_n;
    }
    if let Some(days_back) = args.days_back {
        config.ranking.days_back = days_back;
    }

    fundscan_telemetry::init_logging("warn")?;
    config.validate()?;

    let pipeline = build_pipeline(&config)?;
    match pipeline.run().await {
        Ok(snapshot) => {
            print!("{}", report::format_table(&snapshot));
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Refresh failed");
            eprintln!("Failed to fetch top coins: {e}");
            std::process::exit(1);
        }
    }
}
