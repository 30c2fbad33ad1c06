// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `GamerPower` Fetch
//!
//! HTTP access to the `GamerPower` API and the refresh cycle built on it.
//!
//! ## API
//!
//! - [`api::GiveawaySource`] - Trait for anything that supplies giveaways
//! - [`api::GamerPowerClient`] - HTTP implementation over `reqwest`
//! - [`client::HttpClient`] - Traced HTTP client with a fixed timeout
//!
//! ## Refresh Cycle
//!
//! [`cycle::RefreshCycle`] fetches the listing, works out which giveaways
//! are new since the previous cycle, attaches the worth estimation and
//! returns a [`gamerpower_core::Snapshot`].
//!
//! ## Example
//!
//! ```ignore
//! use gamerpower_fetch::{GamerPowerClient, RefreshCycle};
//! use gamerpower_core::FilterConfig;
//! use std::sync::Arc;
//!
//! let client = GamerPowerClient::new()?;
//! let cycle = RefreshCycle::new(Arc::new(client), FilterConfig::default());
//!
//! let snapshot = cycle.run().await?;
//! println!("{} giveaways", snapshot.len());
//! ```

pub mod api;
pub mod client;
pub mod cycle;
pub mod error;
pub mod probe;

// Re-export key types at crate root
pub use api::{
    DEFAULT_BASE_URL, GamerPowerClient, GiveawaySource, ListingStatus, classify_listing,
    parse_base_url,
};
pub use client::{DEFAULT_TIMEOUT_SECS, HttpClient};
pub use cycle::RefreshCycle;
pub use error::FetchError;
pub use probe::{PROBE_TIMEOUT_SECS, Probe, ProbeResult, is_reachable_status};
