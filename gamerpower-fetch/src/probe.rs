//! Connectivity probe.

use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

use crate::api::{ENDPOINT_GIVEAWAYS, GamerPowerClient};
use crate::client::HttpClient;
use crate::error::FetchError;

/// Probe timeout in seconds.
pub const PROBE_TIMEOUT_SECS: u64 = 10;

/// Result of a probe check.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Whether the API answered with a usable status.
    pub reachable: bool,
    /// Response time in milliseconds.
    pub response_time_ms: u64,
    /// Optional status code.
    pub status_code: Option<u16>,
    /// Optional error message.
    pub error: Option<String>,
}

/// Returns true for the statuses a reachable API answers the listing with.
pub fn is_reachable_status(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}

/// A probe against the giveaway listing.
#[derive(Debug, Clone)]
pub struct Probe {
    /// The URL to probe.
    pub url: Url,
    /// Request timeout.
    pub timeout: Duration,
}

impl Probe {
    /// Creates a probe for the given URL.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
        }
    }

    /// Creates a probe for a client's listing endpoint.
    pub fn for_client(client: &GamerPowerClient) -> Result<Self, FetchError> {
        Ok(Self::new(client.endpoint(ENDPOINT_GIVEAWAYS)?))
    }

    /// Sets the timeout for this probe.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Executes the probe and returns the result.
    pub async fn check(&self) -> ProbeResult {
        let start = Instant::now();

        debug!(url = %self.url, "Running probe");

        let result = match HttpClient::with_timeout(self.timeout) {
            Ok(client) => client.get(&self.url).await,
            Err(e) => Err(e),
        };
        let response_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(response) => ProbeResult {
                reachable: is_reachable_status(response.status()),
                response_time_ms,
                status_code: Some(response.status().as_u16()),
                error: None,
            },
            Err(e) => ProbeResult {
                reachable: false,
                response_time_ms,
                status_code: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reachable_statuses() {
        assert!(is_reachable_status(StatusCode::OK));
        assert!(is_reachable_status(StatusCode::CREATED));
        assert!(!is_reachable_status(StatusCode::NO_CONTENT));
        assert!(!is_reachable_status(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_probe_defaults() {
        let client = GamerPowerClient::new().unwrap();
        let probe = Probe::for_client(&client).unwrap();
        assert_eq!(probe.timeout, Duration::from_secs(10));
        assert_eq!(probe.url.as_str(), "https://www.gamerpower.com/api/giveaways");
    }

    #[tokio::test]
    async fn test_unreachable_probe() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = Url::parse(&format!("http://127.0.0.1:{port}/api/giveaways")).unwrap();
        let result = Probe::new(url)
            .with_timeout(Duration::from_secs(2))
            .check()
            .await;
        assert!(!result.reachable);
        assert!(result.status_code.is_none());
        assert!(result.error.is_some());
    }
}
