//! Unattended discovery run.
//!
//! Reads `MEMORIALS_CONFIG` (default `data/config.toml`) plus the process
//! environment, harvests the configured targets, and submits new entries
//! as unverified. Exits non-zero only when the run cannot start.

use std::path::PathBuf;
use std::process::ExitCode;

use memorials::{error::Result, models::Config, pipeline, utils::http};

const DEFAULT_CONFIG: &str = "data/config.toml";

async fn run() -> Result<()> {
    let config_path = std::env::var("MEMORIALS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG));

    let mut config = Config::load_or_default(&config_path);
    config.apply_env();
    config.validate()?;

    let client = http::create_async_client(&config.http)?;
    pipeline::run_discovery(&config, &client).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Discovery run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
