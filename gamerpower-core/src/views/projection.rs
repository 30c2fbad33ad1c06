//! Pure projections from a snapshot to view values and attributes.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::models::{Giveaway, Snapshot};

/// Most simplified items the active list exposes.
pub const ACTIVE_LIST_LIMIT: usize = 50;

/// Bucket for giveaways without a type.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Worth string assumed when the worth record lacks an estimation.
const MISSING_WORTH: &str = "0";

// ============================================================================
// Scalar Projections
// ============================================================================

/// Number of giveaways, 0 when there is no data yet.
pub fn total_count(snapshot: Option<&Snapshot>) -> usize {
    snapshot.map_or(0, Snapshot::len)
}

/// Total worth in USD as estimated by the API.
///
/// `None` when there is no data yet or the estimation does not parse. A
/// snapshot whose worth record is empty counts as zero.
pub fn total_worth(snapshot: Option<&Snapshot>) -> Option<f64> {
    let snapshot = snapshot?;
    match &snapshot.worth.worth_estimation_usd {
        Some(amount) => amount.to_f64(),
        None => crate::models::parse_currency(MISSING_WORTH),
    }
}

/// Title of the first giveaway in fetch order.
pub fn latest_title(snapshot: Option<&Snapshot>) -> Option<String> {
    snapshot?
        .latest()
        .map(|g| g.title_or_unknown().to_string())
}

// ============================================================================
// Latest Giveaway
// ============================================================================

/// Fixed projection of the latest giveaway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestGiveaway {
    /// Giveaway id.
    pub id: u64,
    /// Title.
    pub title: Option<String>,
    /// Type as reported by the API.
    #[serde(rename = "type")]
    pub giveaway_type: Option<String>,
    /// Comma-joined platforms.
    pub platforms: Option<String>,
    /// Worth string.
    pub worth: Option<String>,
    /// Thumbnail URL.
    pub thumbnail: Option<String>,
    /// Image URL.
    pub image: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Claim instructions.
    pub instructions: Option<String>,
    /// Claim link.
    pub open_giveaway_url: Option<String>,
    /// gamerpower.com page.
    pub gamerpower_url: Option<String>,
    /// Publication date.
    pub published_date: Option<String>,
    /// End date.
    pub end_date: Option<String>,
    /// Status.
    pub status: Option<String>,
}

impl From<&Giveaway> for LatestGiveaway {
    fn from(g: &Giveaway) -> Self {
        Self {
            id: g.id,
            title: g.title.clone(),
            giveaway_type: g.giveaway_type.clone(),
            platforms: g.platforms.clone(),
            worth: g.worth.clone(),
            thumbnail: g.thumbnail.clone(),
            image: g.image.clone(),
            description: g.description.clone(),
            instructions: g.instructions.clone(),
            open_giveaway_url: g.open_giveaway_url.clone(),
            gamerpower_url: g.gamerpower_url.clone(),
            published_date: g.published_date.clone(),
            end_date: g.end_date.clone(),
            status: g.status.clone(),
        }
    }
}

/// The latest giveaway, `None` without data or when the listing is empty.
pub fn latest_giveaway(snapshot: Option<&Snapshot>) -> Option<LatestGiveaway> {
    snapshot?.latest().map(LatestGiveaway::from)
}

// ============================================================================
// Active List
// ============================================================================

/// Simplified projection used in the active list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GiveawaySummary {
    /// Giveaway id.
    pub id: u64,
    /// Title.
    pub title: Option<String>,
    /// Type as reported by the API.
    #[serde(rename = "type")]
    pub giveaway_type: Option<String>,
    /// Comma-joined platforms.
    pub platforms: Option<String>,
    /// Worth string.
    pub worth: Option<String>,
    /// Thumbnail URL.
    pub thumbnail: Option<String>,
    /// Claim link.
    pub open_giveaway_url: Option<String>,
    /// End date.
    pub end_date: Option<String>,
}

impl From<&Giveaway> for GiveawaySummary {
    fn from(g: &Giveaway) -> Self {
        Self {
            id: g.id,
            title: g.title.clone(),
            giveaway_type: g.giveaway_type.clone(),
            platforms: g.platforms.clone(),
            worth: g.worth.clone(),
            thumbnail: g.thumbnail.clone(),
            open_giveaway_url: g.open_giveaway_url.clone(),
            end_date: g.end_date.clone(),
        }
    }
}

/// Giveaway titles grouped by platform name.
///
/// Platforms keep the order they were first seen in, titles keep listing
/// order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformGroups {
    groups: Vec<(String, Vec<String>)>,
}

impl PlatformGroups {
    /// Titles listed under a platform.
    pub fn get(&self, platform: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(name, _)| name == platform)
            .map(|(_, titles)| titles.as_slice())
    }

    /// Platform names in first-seen order.
    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates `(platform, titles)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(name, titles)| (name.as_str(), titles.as_slice()))
    }

    /// Number of distinct platforms.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no platform was seen.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn push(&mut self, platform: &str, title: &str) {
        match self.groups.iter_mut().find(|(name, _)| name == platform) {
            Some((_, titles)) => titles.push(title.to_string()),
            None => self
                .groups
                .push((platform.to_string(), vec![title.to_string()])),
        }
    }
}

impl Serialize for PlatformGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (platform, titles) in &self.groups {
            map.serialize_entry(platform, titles)?;
        }
        map.end()
    }
}

/// Groups every giveaway's title under each platform it lists.
pub fn group_by_platform(giveaways: &[Giveaway]) -> PlatformGroups {
    let mut groups = PlatformGroups::default();
    for giveaway in giveaways {
        for platform in giveaway.platform_names() {
            groups.push(platform, giveaway.title_or_unknown());
        }
    }
    groups
}

/// Attributes of the active list view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveList {
    /// Up to [`ACTIVE_LIST_LIMIT`] simplified giveaways.
    pub giveaways: Vec<GiveawaySummary>,
    /// All giveaways grouped by platform.
    pub by_platform: PlatformGroups,
    /// Titles of the giveaways new since the previous cycle.
    pub new_since_last_update: Vec<Option<String>>,
}

/// Builds the active list. Without data every part is empty.
pub fn active_list(snapshot: Option<&Snapshot>) -> ActiveList {
    let Some(snapshot) = snapshot else {
        return ActiveList::default();
    };

    ActiveList {
        giveaways: snapshot
            .giveaways
            .iter()
            .take(ACTIVE_LIST_LIMIT)
            .map(GiveawaySummary::from)
            .collect(),
        by_platform: group_by_platform(&snapshot.giveaways),
        new_since_last_update: snapshot
            .new_giveaways
            .iter()
            .map(|g| g.title.clone())
            .collect(),
    }
}

// ============================================================================
// Type Breakdown
// ============================================================================

/// Per-type counts next to the API's own active counter.
///
/// The two counts come from different sources and are not reconciled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeBreakdown {
    /// `active_giveaways_number` from the worth endpoint, 0 when absent.
    pub active_giveaways_count: u64,
    /// Local count of giveaways per type value.
    pub by_type: BTreeMap<String, usize>,
}

/// Counts giveaways per type, `None` without data.
pub fn type_breakdown(snapshot: Option<&Snapshot>) -> Option<TypeBreakdown> {
    let snapshot = snapshot?;

    let mut by_type = BTreeMap::new();
    for giveaway in &snapshot.giveaways {
        let key = giveaway.giveaway_type.as_deref().unwrap_or(UNKNOWN_TYPE);
        *by_type.entry(key.to_string()).or_insert(0) += 1;
    }

    Some(TypeBreakdown {
        active_giveaways_count: snapshot.worth.active_giveaways_number.unwrap_or(0),
        by_type,
    })
}

// ============================================================================
// Tests
// ============================================================================
