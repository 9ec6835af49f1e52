//! comprel: reliability and completeness of TESS rotation periods.
//!
//! Usage:
//!   comprel reliability --input-period 9 --ls 0.1
//!   comprel completeness --input-period 9 --t 11.5 --mode recovery
//!   comprel reliability --batch-file stars.csv

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use cli::Cli;
use config::AppConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    // RUST_LOG takes priority over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    if config.json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure batch worker threads")?;
        tracing::debug!(threads, "Configured rayon thread pool");
    }

    cli::run(cli, &config)
}
