//! Domain models for the GamerPower tracker.
//!
//! ## Submodules
//!
//! - [`giveaway`] - A single giveaway listing
//! - [`worth`] - Worth estimation and currency parsing
//! - [`snapshot`] - The result of one fetch cycle and the new-item diff
//! - [`filter`] - Platform/type keys and the filter configuration

mod filter;
mod giveaway;
mod snapshot;
mod worth;

pub use filter::{
    DEFAULT_SCAN_INTERVAL_MINUTES, FILTER_SEPARATOR, FilterConfig, GiveawayType,
    MAX_SCAN_INTERVAL_MINUTES, MIN_SCAN_INTERVAL_MINUTES, Platform,
};
pub use giveaway::{API_DATE_FORMAT, Giveaway};
pub use snapshot::{ATTRIBUTION, Snapshot, giveaway_ids, new_since};
pub use worth::{WorthAmount, WorthEstimation, parse_currency};
