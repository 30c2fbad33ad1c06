//! Core error types for the GamerPower tracker.

use thiserror::Error;

/// Core error type for GamerPower operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown platform key.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    /// Unknown giveaway type key.
    #[error("Unknown giveaway type: {0}")]
    UnknownGiveawayType(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
