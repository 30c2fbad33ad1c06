//! HTTP client with tracing and a fixed per-request timeout.

use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for `GamerPower` requests.
const USER_AGENT: &str = concat!("gamerpower/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing.
///
/// Every request carries the timeout the client was built with. A timed-out
/// request is reported once and never retried.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            timeout,
        })
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Performs a GET request.
    ///
    /// Any status is returned as a response. Only transport failures are
    /// errors.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &Url) -> Result<Response, FetchError> {
        debug!("GET request");

        let response = self
            .inner
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_request(e, self.timeout.as_secs()))?;

        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Reads a response body in full.
    pub async fn read_body(&self, response: Response) -> Result<Vec<u8>, FetchError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_request(e, self.timeout.as_secs()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_custom_timeout() {
        let client = HttpClient::with_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(client.timeout().as_secs(), 10);
    }
}
