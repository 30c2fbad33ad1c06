// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `GamerPower` Store
//!
//! State management for the `GamerPower` tracker.
//!
//! This crate provides:
//!
//! - **`SnapshotStore`**: Latest snapshot, last error and refresh state with watch channels
//! - **`RefreshScheduler`**: Timer task that runs a refresh source into the store
//! - **`SettingsStore`**: Filter configuration with persistence
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use gamerpower_store::{RefreshScheduler, SettingsStore, SnapshotStore};
//! use gamerpower_fetch::{GamerPowerClient, RefreshCycle};
//! use std::sync::Arc;
//!
//! let settings = SettingsStore::load_default().await;
//! let filter = settings.filter().await;
//! let client = GamerPowerClient::with_base_url(&settings.api_base_url().await)?;
//! let cycle = RefreshCycle::new(Arc::new(client), filter.clone());
//!
//! let store = Arc::new(SnapshotStore::new());
//! let handle = RefreshScheduler::new(Arc::new(cycle), store.clone(), filter.scan_interval())
//!     .start()
//!     .await?;
//!
//! // Subscribe to changes
//! let mut rx = store.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("Giveaways updated!");
//! }
//! ```

pub mod error;
pub mod persistence;
pub mod scheduler;
pub mod settings_store;
pub mod snapshot_store;

pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use scheduler::{RefreshScheduler, RefreshSource, RefreshTrigger, SchedulerHandle};
pub use settings_store::{Settings, SettingsStore};
pub use snapshot_store::SnapshotStore;

#[cfg(test)]
mod persistence_tests;
