//! Tapwatch CLI - query the school water-tap dashboard from the terminal.
//!
//! This is the entry point for the `tapwatch` binary. Every command prints
//! its result as JSON on stdout; logs go to stderr.

mod args;
mod commands;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tapwatch_dashboard::{DashboardConfig, DashboardService};
use tapwatch_store::{seed_if_empty, MemoryStore, RocksStore, SeedData};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{Args, Command};

fn load_config(path: Option<&Path>) -> anyhow::Result<DashboardConfig> {
    let Some(path) = path else {
        return Ok(DashboardConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = DashboardConfig::from_json(&json)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
    Ok(config)
}

fn load_seed(path: &Path) -> anyhow::Result<SeedData> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed file {}", path.display()))?;
    SeedData::from_json(&json).with_context(|| format!("parsing seed file {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tapwatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(args.config.as_deref())?;

    if let Command::Seed { file } = &args.command {
        let seed = load_seed(file)?;
        let store = RocksStore::open(&args.data_dir)
            .with_context(|| format!("opening store at {}", args.data_dir.display()))?;
        let seeded = seed_if_empty(&store, &seed)?;
        let records = if seeded { seed.len() } else { 0 };
        return commands::print_json(&serde_json::json!({
            "seeded": seeded,
            "records": records,
        }));
    }

    // A seed file given for a read command runs against a throwaway in-memory
    // store instead of the on-disk one.
    if let Some(path) = &args.seed_file {
        let store = MemoryStore::new();
        seed_if_empty(&store, &load_seed(path)?)?;
        tracing::info!(seed_file = %path.display(), "Using in-memory store");
        let service = DashboardService::new(Arc::new(store), config);
        return commands::run(&service, args.command).await;
    }

    let store = RocksStore::open(&args.data_dir)
        .with_context(|| format!("opening store at {}", args.data_dir.display()))?;
    tracing::info!(data_dir = %args.data_dir.display(), "Opened RocksDB store");
    let service = DashboardService::new(Arc::new(store), config);
    commands::run(&service, args.command).await
}
