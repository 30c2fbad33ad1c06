//! CLI command implementations.

pub mod check;
pub mod config;
pub mod get;
pub mod list;
pub mod refresh;
pub mod summary;
pub mod watch;

use anyhow::Result;
use gamerpower_fetch::{GamerPowerClient, RefreshCycle};
use gamerpower_store::{RefreshScheduler, Settings, SettingsStore, SnapshotStore};
use std::sync::Arc;
use thiserror::Error;

/// Failures that map to a dedicated exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// One or more requested giveaways do not exist.
    #[error("Giveaway not found: {0}")]
    NotFound(String),

    /// The API did not answer the connectivity check.
    #[error("Cannot connect to the GamerPower API: {0}")]
    CannotConnect(String),
}

/// Loads settings from `--config` or the default location.
pub async fn load_settings(cli: &crate::Cli) -> SettingsStore {
    match &cli.config {
        Some(path) => SettingsStore::load(path.clone()).await,
        None => SettingsStore::load_default().await,
    }
}

/// Builds an API client for the configured base URL.
pub fn build_client(settings: &Settings) -> Result<GamerPowerClient> {
    Ok(GamerPowerClient::with_base_url(settings.effective_base_url())?)
}

/// Builds a refresh scheduler over a fresh cycle and store.
pub fn build_scheduler(settings: &Settings) -> Result<RefreshScheduler> {
    let client = build_client(settings)?;
    let cycle = RefreshCycle::new(Arc::new(client), settings.filter.clone());
    Ok(RefreshScheduler::new(
        Arc::new(cycle),
        Arc::new(SnapshotStore::new()),
        settings.filter.scan_interval(),
    ))
}

/// Runs one cycle and returns the store holding its outcome.
pub async fn fetch_once(cli: &crate::Cli) -> Result<Arc<SnapshotStore>> {
    let settings = load_settings(cli).await.get().await;
    let scheduler = build_scheduler(&settings)?;
    scheduler.refresh_once().await?;
    Ok(Arc::clone(scheduler.store()))
}
