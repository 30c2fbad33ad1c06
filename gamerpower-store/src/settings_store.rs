//! User preferences store.
//!
//! Manages the filter configuration with persistence and change
//! notification.

use gamerpower_core::{FilterConfig, GiveawayType, Platform};
use gamerpower_fetch::{DEFAULT_BASE_URL, parse_base_url};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json_or_default, save_json};

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Platform and type filters plus the scan interval.
    pub filter: FilterConfig,
    /// API base URL override. `None` uses the public API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

impl Settings {
    /// Returns the API base URL in effect.
    pub fn effective_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a new settings store.
    pub fn new(path: PathBuf) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing or unreadable file gives the defaults.
    pub async fn load(path: PathBuf) -> Self {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json_or_default(&path).await
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        let store = Self::new(path);
        *store.settings.write().await = settings;
        store
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change().await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Notifies subscribers of a change.
    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Gets the filter configuration.
    pub async fn filter(&self) -> FilterConfig {
        self.settings.read().await.filter.clone()
    }

    /// Replaces the platform selection.
    pub async fn set_platforms(&self, platforms: Vec<Platform>) {
        self.update(|s| s.filter = s.filter.clone().with_platforms(platforms))
            .await;
    }

    /// Replaces the giveaway type selection.
    pub async fn set_giveaway_types(&self, giveaway_types: Vec<GiveawayType>) {
        self.update(|s| s.filter = s.filter.clone().with_giveaway_types(giveaway_types))
            .await;
    }

    /// Sets the scan interval in minutes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the interval is out of bounds. The
    /// stored settings are left unchanged.
    pub async fn set_scan_interval(&self, minutes: u32) -> Result<(), StoreError> {
        let filter = self.filter().await.with_scan_interval_minutes(minutes)?;
        self.update(|s| s.filter = filter).await;
        Ok(())
    }

    /// Gets the API base URL in effect.
    pub async fn api_base_url(&self) -> String {
        self.settings.read().await.effective_base_url().to_string()
    }

    /// Sets or clears the API base URL override.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL is not a usable base URL.
    pub async fn set_api_base_url(&self, url: Option<String>) -> Result<(), StoreError> {
        if let Some(raw) = &url {
            parse_base_url(raw).map_err(|e| StoreError::Config(e.to_string()))?;
        }
        self.update(|s| s.api_base_url = url).await;
        Ok(())
    }

    /// Restores the defaults.
    pub async fn reset(&self) {
        self.update(|s| *s = Settings::default()).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
