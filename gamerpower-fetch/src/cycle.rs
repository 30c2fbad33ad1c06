//! One fetch-and-merge refresh cycle.

use gamerpower_core::{FilterConfig, Giveaway, Snapshot, giveaway_ids, new_since};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::api::GiveawaySource;
use crate::error::FetchError;

/// Runs refresh cycles for one filter configuration.
///
/// The cycle owns the id set of the previous successful listing and uses
/// it to work out which giveaways are new. A fresh cycle has no baseline,
/// so its first run reports nothing as new.
pub struct RefreshCycle {
    source: Arc<dyn GiveawaySource>,
    filter: FilterConfig,
    previous_ids: Mutex<Option<HashSet<u64>>>,
}

impl RefreshCycle {
    /// Creates a cycle without a baseline.
    pub fn new(source: Arc<dyn GiveawaySource>, filter: FilterConfig) -> Self {
        Self {
            source,
            filter,
            previous_ids: Mutex::new(None),
        }
    }

    /// Returns the filter this cycle fetches with.
    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    /// Returns true once a non-empty listing has been fetched.
    pub async fn has_baseline(&self) -> bool {
        self.previous_ids
            .lock()
            .await
            .as_ref()
            .is_some_and(|ids| !ids.is_empty())
    }

    /// Forgets the previous id set.
    pub async fn reset_baseline(&self) {
        *self.previous_ids.lock().await = None;
    }

    /// Runs one cycle.
    ///
    /// A failed listing call aborts the cycle and leaves the baseline
    /// untouched. A failed worth call only empties the worth record.
    #[instrument(skip(self), fields(filtered = self.filter.is_filtered()))]
    pub async fn run(&self) -> Result<Snapshot, FetchError> {
        let giveaways = self.source.fetch_giveaways(&self.filter).await?;

        let new_giveaways = {
            let mut previous = self.previous_ids.lock().await;
            let fresh = new_since(&giveaways, previous.as_ref());
            *previous = Some(giveaway_ids(&giveaways));
            fresh
        };

        let worth = self.source.fetch_worth(&self.filter).await;
        if worth.is_empty() {
            debug!("No worth estimation available");
        }

        info!(
            count = giveaways.len(),
            new = new_giveaways.len(),
            "Refresh cycle complete"
        );
        Ok(Snapshot::new(giveaways, worth, new_giveaways))
    }

    /// Looks up one giveaway. Does not touch the baseline.
    pub async fn lookup(&self, id: u64) -> Option<Giveaway> {
        self.source.fetch_giveaway(id).await
    }
}

impl std::fmt::Debug for RefreshCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCycle")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gamerpower_core::{WorthAmount, WorthEstimation};
    use std::collections::VecDeque;

    /// Replays queued listing results.
    struct ScriptedSource {
        listings: std::sync::Mutex<VecDeque<Result<Vec<Giveaway>, FetchError>>>,
        worth: Option<WorthEstimation>,
    }

    impl ScriptedSource {
        fn new(listings: Vec<Result<Vec<Giveaway>, FetchError>>) -> Self {
            Self {
                listings: std::sync::Mutex::new(listings.into()),
                worth: None,
            }
        }

        fn with_worth(mut self, worth: WorthEstimation) -> Self {
            self.worth = Some(worth);
            self
        }
    }

    #[async_trait]
    impl GiveawaySource for ScriptedSource {
        async fn fetch_giveaways(&self, _filter: &FilterConfig) -> Result<Vec<Giveaway>, FetchError> {
            self.listings
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn fetch_worth(&self, _filter: &FilterConfig) -> WorthEstimation {
            self.worth.clone().unwrap_or_default()
        }

        async fn fetch_giveaway(&self, id: u64) -> Option<Giveaway> {
            (id == 7).then(|| Giveaway::new(7, "Seven"))
        }
    }

    fn items(ids: &[u64]) -> Vec<Giveaway> {
        ids.iter().map(|id| Giveaway::new(*id, format!("Giveaway {id}"))).collect()
    }

    fn cycle(source: ScriptedSource) -> RefreshCycle {
        RefreshCycle::new(Arc::new(source), FilterConfig::default())
    }

    fn ids(giveaways: &[Giveaway]) -> Vec<u64> {
        giveaways.iter().map(|g| g.id).collect()
    }

    #[tokio::test]
    async fn test_first_cycle_has_no_new_items() {
        let cycle = cycle(ScriptedSource::new(vec![Ok(items(&[1, 2, 3]))]));
        assert!(!cycle.has_baseline().await);

        let snapshot = cycle.run().await.unwrap();
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.new_giveaways.is_empty());
        assert!(cycle.has_baseline().await);
    }

    #[tokio::test]
    async fn test_new_items_in_fetch_order() {
        let cycle = cycle(ScriptedSource::new(vec![
            Ok(items(&[1, 2])),
            Ok(items(&[5, 2, 4, 1])),
        ]));

        cycle.run().await.unwrap();
        let snapshot = cycle.run().await.unwrap();

        assert_eq!(ids(&snapshot.new_giveaways), vec![5, 4]);
        let current = ids(&snapshot.giveaways);
        for giveaway in &snapshot.new_giveaways {
            assert!(current.contains(&giveaway.id));
        }
    }

    #[tokio::test]
    async fn test_baseline_tracks_every_cycle() {
        let cycle = cycle(ScriptedSource::new(vec![
            Ok(items(&[1])),
            Ok(items(&[1, 2])),
            Ok(items(&[2, 3])),
        ]));

        cycle.run().await.unwrap();
        assert_eq!(ids(&cycle.run().await.unwrap().new_giveaways), vec![2]);
        assert_eq!(ids(&cycle.run().await.unwrap().new_giveaways), vec![3]);
    }

    #[tokio::test]
    async fn test_empty_first_listing_is_no_baseline() {
        let cycle = cycle(ScriptedSource::new(vec![Ok(Vec::new()), Ok(items(&[9]))]));

        assert!(cycle.run().await.unwrap().is_empty());
        assert!(!cycle.has_baseline().await);
        assert!(cycle.run().await.unwrap().new_giveaways.is_empty());
        assert!(cycle.has_baseline().await);
    }

    #[tokio::test]
    async fn test_empty_cycle_between_listings_reports_nothing_new() {
        // an unexpected status comes back as an empty listing
        let cycle = cycle(ScriptedSource::new(vec![
            Ok(items(&[1, 2, 3])),
            Ok(Vec::new()),
            Ok(items(&[1, 2, 3])),
            Ok(items(&[1, 2, 3, 4])),
        ]));

        cycle.run().await.unwrap();
        assert!(cycle.run().await.unwrap().new_giveaways.is_empty());
        assert!(cycle.run().await.unwrap().new_giveaways.is_empty());
        assert_eq!(ids(&cycle.run().await.unwrap().new_giveaways), vec![4]);
    }

    #[tokio::test]
    async fn test_failed_cycle_keeps_baseline() {
        let cycle = cycle(ScriptedSource::new(vec![
            Ok(items(&[1])),
            Err(FetchError::Timeout(30)),
            Ok(items(&[1, 2])),
        ]));

        cycle.run().await.unwrap();
        assert!(matches!(cycle.run().await, Err(FetchError::Timeout(30))));
        assert_eq!(ids(&cycle.run().await.unwrap().new_giveaways), vec![2]);
    }

    #[tokio::test]
    async fn test_missing_worth_does_not_fail_cycle() {
        let cycle = cycle(ScriptedSource::new(vec![Ok(items(&[1, 2]))]));
        let snapshot = cycle.run().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.worth.is_empty());
    }

    #[tokio::test]
    async fn test_worth_is_attached() {
        let worth = WorthEstimation {
            active_giveaways_number: Some(2),
            worth_estimation_usd: Some(WorthAmount::Text("$10.00".into())),
        };
        let cycle = cycle(ScriptedSource::new(vec![Ok(items(&[1]))]).with_worth(worth.clone()));
        assert_eq!(cycle.run().await.unwrap().worth, worth);
    }

    #[tokio::test]
    async fn test_reset_baseline() {
        let cycle = cycle(ScriptedSource::new(vec![Ok(items(&[1])), Ok(items(&[1, 2]))]));
        cycle.run().await.unwrap();
        cycle.reset_baseline().await;
        assert!(cycle.run().await.unwrap().new_giveaways.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_leaves_baseline_alone() {
        let cycle = cycle(ScriptedSource::new(Vec::new()));
        assert_eq!(cycle.lookup(7).await.map(|g| g.id), Some(7));
        assert!(cycle.lookup(8).await.is_none());
        assert!(!cycle.has_baseline().await);
    }
}
