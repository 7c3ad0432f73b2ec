//! Memorials admin CLI
//!
//! Local entry point for reviewing and maintaining entries. The unattended
//! discovery run also ships as the standalone `discover` binary.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use memorials::{
    error::{AppError, Result},
    models::{Config, MemorialDraft, MemorialEntry, WriteOutcome},
    pipeline,
    search::filter_entries,
    services::MemorialService,
    storage::StaticDataset,
    utils::http,
};

/// Memorials - memorial entry maintenance
#[derive(Parser, Debug)]
#[command(
    name = "memorials",
    version,
    about = "Review, verify, and discover memorial entries"
)]
struct Cli {
    /// Directory containing config.toml
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List entries, newest first
    Fetch {
        /// Include unverified entries
        #[arg(long)]
        all: bool,
    },

    /// Print a single entry as JSON
    Show { id: String },

    /// Mark an entry as verified
    Verify { id: String },

    /// Delete an entry
    Delete { id: String },

    /// Create or edit an entry from a JSON file
    Submit { file: PathBuf },

    /// Search entries by name, place, or biography
    Search {
        query: String,

        /// Include unverified entries
        #[arg(long)]
        all: bool,
    },

    /// Harvest new posts and submit them for review
    Discover,

    /// Validate configuration and the static dataset
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_entries(entries: &[&MemorialEntry]) {
    for entry in entries {
        println!(
            "{:<32} {:<28} {:<16} {:<10} {}",
            entry.id,
            entry.name,
            entry.city,
            entry.date,
            if entry.verified { "verified" } else { "pending" }
        );
    }
}

/// Turn a failed write into an error so the process exits non-zero.
fn finish(action: &str, target: &str, outcome: WriteOutcome) -> Result<()> {
    if outcome.success {
        log::info!("{} {}", action, target);
        return Ok(());
    }

    let message = outcome.error.unwrap_or_default();
    log::error!("{} failed for {}: {}", action, target, message);
    Err(AppError::validation(message))
}

fn read_draft(path: &Path) -> Result<MemorialDraft> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.data_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);
    config.apply_env();

    log::debug!("Loaded configuration from {}", config_path.display());

    let client = http::create_async_client(&config.http)?;
    let service = MemorialService::from_config(&config, client.clone());

    match cli.command {
        Command::Fetch { all } => {
            let entries = service.fetch_memorials(all).await;
            print_entries(&entries.iter().collect::<Vec<_>>());
            log::info!("{} entries", entries.len());
        }

        Command::Show { id } => match service.fetch_memorial(&id).await {
            Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
            None => {
                log::error!("No entry with id {}", id);
                return Err(AppError::validation(format!("Entry not found: {}", id)));
            }
        },

        Command::Verify { id } => {
            finish("Verified", &id, service.verify_memorial(&id).await)?;
        }

        Command::Delete { id } => {
            finish("Deleted", &id, service.delete_memorial(&id).await)?;
        }

        Command::Submit { file } => {
            let draft = read_draft(&file)?;
            let target = draft
                .id
                .clone()
                .or_else(|| draft.name.clone())
                .unwrap_or_else(|| file.display().to_string());

            finish("Saved", &target, service.submit_memorial(draft).await)?;
        }

        Command::Search { query, all } => {
            let entries = service.fetch_memorials(all).await;
            let matches = filter_entries(&entries, &query);
            print_entries(&matches);
            log::info!("{} of {} entries match {:?}", matches.len(), entries.len(), query);
        }

        Command::Discover => {
            let summary = pipeline::run_discovery(&config, &client).await?;
            log::info!(
                "Discovery complete: {} added, {} skipped, {} failed",
                summary.added,
                summary.skipped,
                summary.failed
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let dataset = StaticDataset::new(&config.paths.fallback_file);
            let entries = dataset.load().await.inspect_err(|e| {
                log::error!(
                    "Static dataset {} is invalid: {}",
                    dataset.path().display(),
                    e
                )
            })?;
            log::info!("✓ Static dataset OK ({} entries)", entries.len());

            if !service.is_connected() {
                log::warn!("Store is not configured; reads will use the static dataset");
            }

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
