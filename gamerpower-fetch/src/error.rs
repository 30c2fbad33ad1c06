//! Fetch error types.

use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
///
/// Only failures of the primary listing call surface as a `FetchError`.
/// Worth and single-giveaway lookups degrade to empty results instead.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured base URL cannot be used.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl FetchError {
    /// Converts a request error, reporting timeouts as [`FetchError::Timeout`].
    pub fn from_request(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout_secs)
        } else {
            FetchError::Http(err)
        }
    }

    /// Returns true if the API could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        match self {
            FetchError::Timeout(_) => true,
            FetchError::Http(err) => err.is_connect() || err.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FetchError::Timeout(30).to_string(),
            "Request timed out after 30 seconds"
        );
        assert_eq!(
            FetchError::InvalidBaseUrl("ftp://x".into()).to_string(),
            "Invalid base URL: ftp://x"
        );
    }

    #[test]
    fn test_connectivity_classification() {
        assert!(FetchError::Timeout(10).is_connectivity());
        assert!(!FetchError::InvalidBaseUrl("ftp://x".into()).is_connectivity());
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<Vec<u64>>("{").unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::Json(_)));
    }
}
