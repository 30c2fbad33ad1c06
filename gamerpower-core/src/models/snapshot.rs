//! Snapshot of one fetch cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::giveaway::Giveaway;
use super::worth::WorthEstimation;

/// Attribution attached to every snapshot.
pub const ATTRIBUTION: &str = "Data provided by GamerPower.com";

/// The full result of one fetch cycle.
///
/// Snapshots are replaced wholesale each cycle. `new_giveaways` only ever
/// holds items that are also in `giveaways`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Giveaways in the order the API returned them.
    pub giveaways: Vec<Giveaway>,
    /// Worth estimation, empty when the worth call failed.
    pub worth: WorthEstimation,
    /// Giveaways not present in the previous cycle.
    pub new_giveaways: Vec<Giveaway>,
    /// Data attribution.
    pub attribution: String,
    /// When the cycle finished.
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Creates a snapshot stamped with the current time.
    pub fn new(
        giveaways: Vec<Giveaway>,
        worth: WorthEstimation,
        new_giveaways: Vec<Giveaway>,
    ) -> Self {
        Self {
            giveaways,
            worth,
            new_giveaways,
            attribution: ATTRIBUTION.to_string(),
            fetched_at: Utc::now(),
        }
    }

    /// Creates a snapshot with no giveaways.
    pub fn empty() -> Self {
        Self::new(Vec::new(), WorthEstimation::default(), Vec::new())
    }

    /// Number of giveaways.
    pub fn len(&self) -> usize {
        self.giveaways.len()
    }

    /// Returns true if the cycle found nothing.
    pub fn is_empty(&self) -> bool {
        self.giveaways.is_empty()
    }

    /// The first giveaway in fetch order.
    pub fn latest(&self) -> Option<&Giveaway> {
        self.giveaways.first()
    }
}

/// Collects the ids of a listing.
pub fn giveaway_ids(giveaways: &[Giveaway]) -> HashSet<u64> {
    giveaways.iter().map(|g| g.id).collect()
}

/// Returns the giveaways whose id is not in `previous`, in listing order.
///
/// Without a previous baseline nothing counts as new. An empty previous
/// set is not a baseline either, so a cycle that came back empty never
/// makes the next full listing look new.
pub fn new_since(giveaways: &[Giveaway], previous: Option<&HashSet<u64>>) -> Vec<Giveaway> {
    let Some(previous) = previous.filter(|ids| !ids.is_empty()) else {
        return Vec::new();
    };

    giveaways
        .iter()
        .filter(|g| !previous.contains(&g.id))
        .cloned()
        .collect()
}
