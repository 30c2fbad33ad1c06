// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `GamerPower` Core
//!
//! Core types, models, and views for the `GamerPower` giveaway tracker.
//!
//! This crate provides the foundational types used across all other
//! `GamerPower` crates, including:
//!
//! - Domain models (giveaways, worth estimation, snapshots)
//! - Filter configuration (platforms, types, scan interval)
//! - The view table that projects a snapshot into displayable values
//! - Error types
//!
//! ## Key Types
//!
//! ### Giveaway Types
//! - [`Giveaway`] - One giveaway as returned by the API
//! - [`WorthEstimation`] - Output of the worth endpoint
//! - [`Snapshot`] - Result of one fetch cycle
//!
//! ### Filter Types
//! - [`Platform`] - Platform filter keys
//! - [`GiveawayType`] - Giveaway type filter keys
//! - [`FilterConfig`] - Validated filter selection and scan interval
//!
//! ### Views
//! - [`ViewKind`] - Enum of all views
//! - [`ViewState`] - A rendered view
//! - [`render_all`] - Evaluate every view against a snapshot

pub mod error;
pub mod models;
pub mod views;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Filter types
    DEFAULT_SCAN_INTERVAL_MINUTES,
    FILTER_SEPARATOR,
    FilterConfig,
    GiveawayType,
    MAX_SCAN_INTERVAL_MINUTES,
    MIN_SCAN_INTERVAL_MINUTES,
    Platform,
    // Giveaway types
    API_DATE_FORMAT,
    Giveaway,
    // Snapshot types
    ATTRIBUTION,
    Snapshot,
    giveaway_ids,
    new_since,
    // Worth types
    WorthAmount,
    WorthEstimation,
    parse_currency,
};

// Re-export views
pub use views::{ActiveList, ViewKind, ViewState, ViewValue, active_list, render, render_all};
