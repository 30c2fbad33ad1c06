//! Read-only views over the latest snapshot.
//!
//! Every view is an entry of one table keyed by [`ViewKind`]. An entry
//! carries display metadata plus a value extractor and an attribute
//! extractor, both pure functions of `Option<&Snapshot>` where `None`
//! means no cycle has succeeded yet.

mod projection;

pub use projection::{
    ACTIVE_LIST_LIMIT, ActiveList, GiveawaySummary, LatestGiveaway, PlatformGroups,
    TypeBreakdown, UNKNOWN_TYPE, active_list, group_by_platform, latest_giveaway, latest_title,
    total_count, total_worth, type_breakdown,
};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{ATTRIBUTION, Snapshot};

/// Attribute map exposed by a view.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// View Kind
// ============================================================================

/// The views derived from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Number of giveaways.
    TotalGiveaways,
    /// Estimated total worth in USD.
    TotalWorth,
    /// First giveaway in fetch order.
    LatestGiveaway,
    /// Capped list, platform grouping and new titles.
    ActiveGiveawaysList,
}

impl ViewKind {
    /// Returns all views in display order.
    pub fn all() -> &'static [ViewKind] {
        &[
            ViewKind::TotalGiveaways,
            ViewKind::TotalWorth,
            ViewKind::LatestGiveaway,
            ViewKind::ActiveGiveawaysList,
        ]
    }

    /// Returns the table entry for this view.
    pub fn spec(self) -> &'static ViewSpec {
        match self {
            ViewKind::TotalGiveaways => &VIEWS[0],
            ViewKind::TotalWorth => &VIEWS[1],
            ViewKind::LatestGiveaway => &VIEWS[2],
            ViewKind::ActiveGiveawaysList => &VIEWS[3],
        }
    }

    /// Stable key.
    pub fn key(self) -> &'static str {
        self.spec().key
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// View Value
// ============================================================================

/// Scalar value of a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewValue {
    /// An item count.
    Count(usize),
    /// A currency amount, `None` when it could not be determined.
    Amount(Option<f64>),
    /// A text value, `None` when there is nothing to show.
    Text(Option<String>),
}

impl ViewValue {
    /// Returns true if the value is absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, ViewValue::Amount(None) | ViewValue::Text(None))
    }
}

impl fmt::Display for ViewValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewValue::Count(count) => write!(f, "{count}"),
            ViewValue::Amount(Some(amount)) => write!(f, "{amount:.2}"),
            ViewValue::Text(Some(text)) => write!(f, "{text}"),
            ViewValue::Amount(None) | ViewValue::Text(None) => write!(f, "-"),
        }
    }
}

// ============================================================================
// View Table
// ============================================================================

/// One entry of the view table.
#[derive(Debug)]
pub struct ViewSpec {
    /// Which view this is.
    pub kind: ViewKind,
    /// Stable key.
    pub key: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Material Design icon identifier.
    pub icon: &'static str,
    /// Unit of the value, if any.
    pub unit: Option<&'static str>,
    /// Extracts the scalar value.
    pub value: fn(Option<&Snapshot>) -> ViewValue,
    /// Extracts the attribute map.
    pub attributes: fn(Option<&Snapshot>) -> Attributes,
}

/// The view table, in display order.
pub static VIEWS: [ViewSpec; 4] = [
    ViewSpec {
        kind: ViewKind::TotalGiveaways,
        key: "total_giveaways",
        name: "Total Giveaways",
        icon: "mdi:gift",
        unit: None,
        value: |snapshot| ViewValue::Count(total_count(snapshot)),
        attributes: |snapshot| to_attributes(type_breakdown(snapshot)),
    },
    ViewSpec {
        kind: ViewKind::TotalWorth,
        key: "total_worth",
        name: "Total Worth",
        icon: "mdi:currency-usd",
        unit: Some("USD"),
        value: |snapshot| ViewValue::Amount(total_worth(snapshot)),
        attributes: |_| Attributes::new(),
    },
    ViewSpec {
        kind: ViewKind::LatestGiveaway,
        key: "latest_giveaway",
        name: "Latest Giveaway",
        icon: "mdi:new-box",
        unit: None,
        value: |snapshot| ViewValue::Text(latest_title(snapshot)),
        attributes: |snapshot| to_attributes(latest_giveaway(snapshot)),
    },
    ViewSpec {
        kind: ViewKind::ActiveGiveawaysList,
        key: "active_giveaways_list",
        name: "Active Giveaways List",
        icon: "mdi:format-list-bulleted",
        unit: None,
        value: |snapshot| ViewValue::Count(total_count(snapshot)),
        attributes: |snapshot| to_attributes(Some(active_list(snapshot))),
    },
];

/// Serializes a projection into an attribute map.
///
/// `None` and anything that does not serialize to an object give an empty
/// map.
fn to_attributes<T: Serialize>(projection: Option<T>) -> Attributes {
    match projection.map(serde_json::to_value) {
        Some(Ok(serde_json::Value::Object(map))) => map,
        _ => Attributes::new(),
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// A rendered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    /// Which view this is.
    pub kind: ViewKind,
    /// Human-readable name.
    pub name: &'static str,
    /// Icon identifier.
    pub icon: &'static str,
    /// Unit of the value, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    /// Scalar value.
    pub value: ViewValue,
    /// Attribute map.
    pub attributes: Attributes,
    /// Data attribution.
    pub attribution: String,
}

impl ViewSpec {
    /// Evaluates this entry against a snapshot.
    pub fn render(&self, snapshot: Option<&Snapshot>) -> ViewState {
        ViewState {
            kind: self.kind,
            name: self.name,
            icon: self.icon,
            unit: self.unit,
            value: (self.value)(snapshot),
            attributes: (self.attributes)(snapshot),
            attribution: snapshot
                .map_or(ATTRIBUTION, |s| s.attribution.as_str())
                .to_string(),
        }
    }
}

/// Renders a single view.
pub fn render(kind: ViewKind, snapshot: Option<&Snapshot>) -> ViewState {
    kind.spec().render(snapshot)
}

/// Renders every view in table order.
pub fn render_all(snapshot: Option<&Snapshot>) -> Vec<ViewState> {
    VIEWS.iter().map(|spec| spec.render(snapshot)).collect()
}
