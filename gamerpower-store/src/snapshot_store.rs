//! Latest-snapshot state store.
//!
//! Holds the result of the most recent refresh for readers, with change
//! notifications for live displays.

use chrono::{DateTime, Utc};
use gamerpower_core::{Snapshot, ViewState, render_all};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, warn};

// ============================================================================
// Inner State
// ============================================================================

/// Internal state for the snapshot store.
#[derive(Default)]
struct SnapshotStoreInner {
    /// Last successful snapshot.
    snapshot: Option<Snapshot>,
    /// Error of the most recent cycle, cleared by the next success.
    last_error: Option<String>,
    /// When the most recent cycle ended, successful or not.
    last_refresh: Option<DateTime<Utc>>,
    /// Whether a cycle is running.
    refreshing: bool,
}

// ============================================================================
// Snapshot Store
// ============================================================================

/// State store for the latest snapshot.
///
/// A failed cycle records its error but keeps the previous snapshot
/// readable. Observable via a watch channel carrying a version counter.
pub struct SnapshotStore {
    inner: Arc<RwLock<SnapshotStoreInner>>,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(SnapshotStoreInner::default())),
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    // ========================================================================
    // Snapshot Access
    // ========================================================================

    /// Gets the last successful snapshot.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.inner.read().await.snapshot.clone()
    }

    /// Returns true once a cycle has succeeded.
    pub async fn has_data(&self) -> bool {
        self.inner.read().await.snapshot.is_some()
    }

    /// Stores a successful cycle result and clears the error.
    pub async fn set_snapshot(&self, snapshot: Snapshot) {
        let count = snapshot.len();
        {
            let mut inner = self.inner.write().await;
            inner.snapshot = Some(snapshot);
            inner.last_error = None;
        }
        self.notify_change().await;
        debug!(count, "Snapshot updated");
    }

    /// Renders every view against the current snapshot.
    pub async fn render_views(&self) -> Vec<ViewState> {
        render_all(self.inner.read().await.snapshot.as_ref())
    }

    /// Drops the snapshot and error.
    pub async fn clear(&self) {
        {
            let mut inner = self.inner.write().await;
            *inner = SnapshotStoreInner::default();
        }
        self.notify_change().await;
        debug!("Snapshot store cleared");
    }

    // ========================================================================
    // Refresh Management
    // ========================================================================

    /// Marks a cycle as running.
    pub async fn start_refresh(&self) {
        self.inner.write().await.refreshing = true;
        self.notify_change().await;
    }

    /// Marks the running cycle as done.
    pub async fn end_refresh(&self) {
        {
            let mut inner = self.inner.write().await;
            inner.refreshing = false;
            inner.last_refresh = Some(Utc::now());
        }
        self.notify_change().await;
    }

    /// Checks if a cycle is running.
    pub async fn is_refreshing(&self) -> bool {
        self.inner.read().await.refreshing
    }

    /// Gets the time the last cycle ended.
    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_refresh
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Gets the error of the most recent cycle.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.read().await.last_error.clone()
    }

    /// Records a failed cycle. The previous snapshot stays.
    pub async fn set_error(&self, error: String) {
        {
            let mut inner = self.inner.write().await;
            inner.last_error = Some(error);
        }
        self.notify_change().await;
        warn!("Refresh error recorded");
    }

    // ========================================================================
    // Observable
    // ========================================================================

    /// Subscribes to store changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Notifies subscribers of a change.
    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gamerpower_core::{Giveaway, ViewValue, WorthEstimation};

    fn snapshot(ids: &[u64]) -> Snapshot {
        let giveaways = ids.iter().map(|id| Giveaway::new(*id, format!("G{id}"))).collect();
        Snapshot::new(giveaways, WorthEstimation::default(), Vec::new())
    }

    #[tokio::test]
    async fn test_new_store() {
        let store = SnapshotStore::new();
        assert!(store.snapshot().await.is_none());
        assert!(!store.has_data().await);
        assert!(store.last_error().await.is_none());
        assert!(store.last_refresh().await.is_none());
    }

    #[tokio::test]
    async fn test_error_keeps_snapshot() {
        let store = SnapshotStore::new();
        store.set_snapshot(snapshot(&[1, 2])).await;
        store.set_error("Request timed out after 30 seconds".into()).await;

        assert_eq!(store.snapshot().await.map(|s| s.len()), Some(2));
        assert!(store.last_error().await.is_some());

        store.set_snapshot(snapshot(&[3])).await;
        assert!(store.last_error().await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_tracking() {
        let store = SnapshotStore::new();
        assert!(!store.is_refreshing().await);

        store.start_refresh().await;
        assert!(store.is_refreshing().await);

        store.end_refresh().await;
        assert!(!store.is_refreshing().await);
        assert!(store.last_refresh().await.is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let store = SnapshotStore::new();
        store.set_snapshot(snapshot(&[1])).await;
        store.set_error("boom".into()).await;
        store.clear().await;

        assert!(store.snapshot().await.is_none());
        assert!(store.last_error().await.is_none());
    }

    #[tokio::test]
    async fn test_render_views() {
        let store = SnapshotStore::new();
        assert_eq!(store.render_views().await[0].value, ViewValue::Count(0));

        store.set_snapshot(snapshot(&[1, 2, 3])).await;
        assert_eq!(store.render_views().await[0].value, ViewValue::Count(3));
    }

    #[tokio::test]
    async fn test_subscribe_sees_updates() {
        let store = SnapshotStore::new();
        let mut rx = store.subscribe();
        store.set_snapshot(snapshot(&[1])).await;
        assert!(rx.has_changed().unwrap());
        let _ = *rx.borrow_and_update();
        assert!(!rx.has_changed().unwrap());
    }
}
