//! Periodic refresh scheduler.
//!
//! One tokio task owns the timer and runs each refresh to completion before
//! looking at the next tick or command. Results land in a
//! [`SnapshotStore`].

use async_trait::async_trait;
use gamerpower_core::Snapshot;
use gamerpower_fetch::RefreshCycle;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::snapshot_store::SnapshotStore;

/// Queued commands beyond this are dropped; a refresh is already pending.
const COMMAND_BUFFER: usize = 4;

// ============================================================================
// Refresh Source
// ============================================================================

/// Something the scheduler can refresh from.
#[async_trait]
pub trait RefreshSource: Send + Sync {
    /// Produces a new snapshot.
    async fn refresh(&self) -> Result<Snapshot, StoreError>;
}

#[async_trait]
impl RefreshSource for RefreshCycle {
    async fn refresh(&self) -> Result<Snapshot, StoreError> {
        Ok(self.run().await?)
    }
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Refresh,
    Shutdown,
}

/// Cloneable handle for requesting out-of-cycle refreshes.
#[derive(Debug, Clone)]
pub struct RefreshTrigger {
    commands: mpsc::Sender<Command>,
}

impl RefreshTrigger {
    /// Asks the scheduler to refresh now.
    ///
    /// Requests made while others are still queued are coalesced.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SchedulerStopped`] once the scheduler is gone.
    pub fn request_refresh(&self) -> Result<(), StoreError> {
        match self.commands.try_send(Command::Refresh) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => Ok(()),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(StoreError::SchedulerStopped),
        }
    }
}

// ============================================================================
// Refresh Scheduler
// ============================================================================

/// Runs a [`RefreshSource`] on a fixed interval.
pub struct RefreshScheduler {
    source: Arc<dyn RefreshSource>,
    store: Arc<SnapshotStore>,
    interval: Duration,
}

impl RefreshScheduler {
    /// Creates a scheduler. Nothing runs until it is started.
    pub fn new(source: Arc<dyn RefreshSource>, store: Arc<SnapshotStore>, interval: Duration) -> Self {
        Self {
            source,
            store,
            // tokio intervals must be non-zero
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Returns the refresh interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the store refreshes are recorded in.
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Runs one refresh and records the outcome in the store.
    ///
    /// # Errors
    ///
    /// Returns the refresh error after recording it.
    pub async fn refresh_once(&self) -> Result<(), StoreError> {
        self.store.start_refresh().await;
        let result = self.source.refresh().await;

        let outcome = match result {
            Ok(snapshot) => {
                self.store.set_snapshot(snapshot).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Refresh failed");
                self.store.set_error(e.to_string()).await;
                Err(e)
            }
        };

        self.store.end_refresh().await;
        outcome
    }

    /// Runs a first refresh and starts the timer only if it succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] if the first refresh fails. The
    /// failure is recorded in the store.
    pub async fn start(self) -> Result<SchedulerHandle, StoreError> {
        self.refresh_once()
            .await
            .map_err(|e| StoreError::NotReady(e.to_string()))?;

        let first_tick = Instant::now() + self.interval;
        Ok(self.spawn_at(first_tick))
    }

    /// Starts the timer with an immediate first refresh.
    pub fn spawn(self) -> SchedulerHandle {
        self.spawn_at(Instant::now())
    }

    fn spawn_at(self, first_tick: Instant) -> SchedulerHandle {
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let store = Arc::clone(&self.store);
        info!(interval_secs = self.interval.as_secs(), "Refresh scheduler started");
        let task = tokio::spawn(self.run(first_tick, receiver));

        SchedulerHandle {
            trigger: RefreshTrigger { commands },
            task,
            store,
        }
    }

    async fn run(self, first_tick: Instant, mut commands: mpsc::Receiver<Command>) {
        let mut ticker = tokio::time::interval_at(first_tick, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    debug!("Scheduled refresh");
                    let _ = self.refresh_once().await;
                }
                command = commands.recv() => match command {
                    Some(Command::Refresh) => {
                        debug!("Manual refresh");
                        let _ = self.refresh_once().await;
                        ticker.reset();
                    }
                    Some(Command::Shutdown) | None => break,
                },
            }
        }

        info!("Refresh scheduler stopped");
    }
}

// ============================================================================
// Scheduler Handle
// ============================================================================

/// Handle to a running scheduler.
pub struct SchedulerHandle {
    trigger: RefreshTrigger,
    task: JoinHandle<()>,
    store: Arc<SnapshotStore>,
}

impl SchedulerHandle {
    /// Asks the scheduler to refresh now.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SchedulerStopped`] once the scheduler is gone.
    pub fn request_refresh(&self) -> Result<(), StoreError> {
        self.trigger.request_refresh()
    }

    /// Returns a cloneable refresh trigger.
    pub fn trigger(&self) -> RefreshTrigger {
        self.trigger.clone()
    }

    /// Returns the store the scheduler writes to.
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Returns true while the scheduler task is alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the scheduler. A refresh in progress finishes first.
    pub async fn shutdown(self) {
        // a closed channel means the task already exited
        let _ = self.trigger.commands.send(Command::Shutdown).await;
        if let Err(e) = self.task.await {
            warn!(error = %e, "Refresh scheduler task failed");
        }
    }

    /// Replaces the source and interval.
    ///
    /// Stops this scheduler, clears the store, and starts a new scheduler
    /// with an immediate refresh.
    pub async fn reconfigure(
        self,
        source: Arc<dyn RefreshSource>,
        interval: Duration,
    ) -> SchedulerHandle {
        let store = Arc::clone(&self.store);
        self.shutdown().await;
        store.clear().await;
        info!("Refresh scheduler reconfigured");
        RefreshScheduler::new(source, store, interval).spawn()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gamerpower_core::{Giveaway, WorthEstimation};
    use gamerpower_fetch::FetchError;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LONG: Duration = Duration::from_secs(3600);

    /// Replays queued outcomes, then keeps succeeding with one item.
    struct FakeSource {
        outcomes: Mutex<VecDeque<Result<usize, ()>>>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(outcomes: Vec<Result<usize, ()>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RefreshSource for FakeSource {
        async fn refresh(&self) -> Result<Snapshot, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(1));
            match outcome {
                Ok(count) => {
                    let giveaways = (0..count as u64).map(|i| Giveaway::new(i, "G")).collect();
                    Ok(Snapshot::new(giveaways, WorthEstimation::default(), Vec::new()))
                }
                Err(()) => Err(StoreError::FetchFailed(FetchError::Timeout(30))),
            }
        }
    }

    /// Waits until `source` has been called `calls` times and the store is idle.
    async fn wait_for_calls(store: &SnapshotStore, source: &FakeSource, calls: usize) {
        let mut rx = store.subscribe();
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if source.calls() >= calls && !store.is_refreshing().await {
                    break;
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
        .await
        .expect("timed out waiting for refresh");
    }

    #[tokio::test]
    async fn test_start_requires_first_refresh() {
        let store = Arc::new(SnapshotStore::new());
        let source = FakeSource::new(vec![Err(())]);
        let result = RefreshScheduler::new(source.clone(), store.clone(), LONG).start().await;

        assert!(matches!(result, Err(StoreError::NotReady(_))));
        assert!(store.last_error().await.is_some());
        assert!(store.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_start_stores_snapshot() {
        let store = Arc::new(SnapshotStore::new());
        let source = FakeSource::new(vec![Ok(3)]);
        let handle = RefreshScheduler::new(source.clone(), store.clone(), LONG)
            .start()
            .await
            .unwrap();

        assert_eq!(store.snapshot().await.map(|s| s.len()), Some(3));
        assert!(store.last_refresh().await.is_some());
        assert!(handle.is_running());
        assert_eq!(source.calls(), 1);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_manual_refresh() {
        let store = Arc::new(SnapshotStore::new());
        let source = FakeSource::new(vec![Ok(1), Ok(5)]);
        let handle = RefreshScheduler::new(source.clone(), store.clone(), LONG)
            .start()
            .await
            .unwrap();

        handle.request_refresh().unwrap();
        wait_for_calls(&store, &source, 2).await;

        assert_eq!(store.snapshot().await.map(|s| s.len()), Some(5));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_snapshot() {
        let store = Arc::new(SnapshotStore::new());
        let source = FakeSource::new(vec![Ok(2), Err(())]);
        let handle = RefreshScheduler::new(source.clone(), store.clone(), LONG)
            .start()
            .await
            .unwrap();

        handle.request_refresh().unwrap();
        wait_for_calls(&store, &source, 2).await;

        assert_eq!(store.snapshot().await.map(|s| s.len()), Some(2));
        assert!(store.last_error().await.is_some());
        assert!(handle.is_running());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_interval_ticks() {
        let store = Arc::new(SnapshotStore::new());
        let source = FakeSource::new(Vec::new());
        let handle = RefreshScheduler::new(source.clone(), store.clone(), Duration::from_millis(20))
            .spawn();

        wait_for_calls(&store, &source, 3).await;
        assert!(source.calls() >= 3);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_trigger_after_shutdown() {
        let store = Arc::new(SnapshotStore::new());
        let source = FakeSource::new(Vec::new());
        let handle = RefreshScheduler::new(source, store, LONG).start().await.unwrap();

        let trigger = handle.trigger();
        handle.shutdown().await;
        assert!(matches!(
            trigger.request_refresh(),
            Err(StoreError::SchedulerStopped)
        ));
    }

    #[tokio::test]
    async fn test_reconfigure_swaps_source() {
        let store = Arc::new(SnapshotStore::new());
        let first = FakeSource::new(vec![Ok(2)]);
        let handle = RefreshScheduler::new(first.clone(), store.clone(), LONG)
            .start()
            .await
            .unwrap();

        let second = FakeSource::new(vec![Ok(7)]);
        let handle = handle.reconfigure(second.clone(), LONG).await;
        wait_for_calls(&store, &second, 1).await;

        assert_eq!(first.calls(), 1);
        assert_eq!(store.snapshot().await.map(|s| s.len()), Some(7));
        handle.shutdown().await;
    }
}
