//! Store error types.

use gamerpower_core::CoreError;
use gamerpower_fetch::FetchError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A refresh cycle failed.
    #[error("Fetch failed: {0}")]
    FetchFailed(#[from] FetchError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The first refresh did not succeed.
    #[error("Not ready: {0}")]
    NotReady(String),

    /// The scheduler task is no longer running.
    #[error("Refresh scheduler has stopped")]
    SchedulerStopped,
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        StoreError::Config(err.to_string())
    }
}

impl StoreError {
    /// Returns true if the failure came from not reaching the API.
    pub fn is_connectivity(&self) -> bool {
        match self {
            StoreError::FetchFailed(e) => e.is_connectivity(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_is_config() {
        let err: StoreError = CoreError::InvalidConfig("interval".into()).into();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_connectivity() {
        assert!(StoreError::FetchFailed(FetchError::Timeout(30)).is_connectivity());
        assert!(!StoreError::SchedulerStopped.is_connectivity());
    }
}
