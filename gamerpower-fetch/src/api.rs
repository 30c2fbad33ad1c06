//! The `GamerPower` HTTP API.
//!
//! [`GiveawaySource`] is the seam the refresh cycle fetches through;
//! [`GamerPowerClient`] implements it over HTTP.

use async_trait::async_trait;
use gamerpower_core::{FilterConfig, Giveaway, WorthEstimation};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::client::HttpClient;
use crate::error::FetchError;

/// Public API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.gamerpower.com/api";

/// Endpoint listing every live giveaway.
pub const ENDPOINT_GIVEAWAYS: &str = "giveaways";
/// Endpoint listing giveaways matching platform and type filters.
pub const ENDPOINT_FILTER: &str = "filter";
/// Endpoint returning one giveaway by id.
pub const ENDPOINT_GIVEAWAY: &str = "giveaway";
/// Endpoint returning the worth estimation.
pub const ENDPOINT_WORTH: &str = "worth";

// ============================================================================
// Giveaway Source
// ============================================================================

/// Something that can supply giveaway data.
#[async_trait]
pub trait GiveawaySource: Send + Sync {
    /// Fetches the giveaway listing for a filter.
    ///
    /// Empty-result and unexpected statuses give an empty list. Transport
    /// failures and undecodable bodies are errors.
    async fn fetch_giveaways(&self, filter: &FilterConfig) -> Result<Vec<Giveaway>, FetchError>;

    /// Fetches the worth estimation, or an empty record on any failure.
    async fn fetch_worth(&self, filter: &FilterConfig) -> WorthEstimation;

    /// Fetches one giveaway, or `None` on any failure.
    async fn fetch_giveaway(&self, id: u64) -> Option<Giveaway>;
}

// ============================================================================
// Status Classification
// ============================================================================

/// How a listing response status is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    /// The body holds a giveaway array.
    Items,
    /// The API reports nothing available.
    NoContent,
    /// Any other status. Treated as empty with a warning.
    Unexpected,
}

/// Classifies a listing response status.
///
/// The API answers 201 when a filter matches nothing.
pub fn classify_listing(status: StatusCode) -> ListingStatus {
    match status {
        StatusCode::OK => ListingStatus::Items,
        StatusCode::CREATED | StatusCode::NO_CONTENT => ListingStatus::NoContent,
        _ => ListingStatus::Unexpected,
    }
}

// ============================================================================
// Base URL
// ============================================================================

/// Parses and validates an API base URL.
///
/// Only `http` and `https` URLs that can carry a path are accepted. A
/// trailing slash is ignored.
pub fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| FetchError::InvalidBaseUrl(format!("{raw}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidBaseUrl(format!(
            "{raw}: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() {
        return Err(FetchError::InvalidBaseUrl(format!("{raw}: not a base URL")));
    }
    Ok(url)
}

// ============================================================================
// GamerPower Client
// ============================================================================

/// HTTP implementation of [`GiveawaySource`].
#[derive(Debug, Clone)]
pub struct GamerPowerClient {
    client: HttpClient,
    base_url: Url,
}

impl GamerPowerClient {
    /// Creates a client for the public API.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client for a custom base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Replaces the HTTP client.
    pub fn with_client(mut self, client: HttpClient) -> Self {
        self.client = client;
        self
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL of an endpoint below the base URL.
    pub fn endpoint(&self, endpoint: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(endpoint);
        Ok(url)
    }

    /// URL of the listing call for a filter.
    ///
    /// An unfiltered config uses the plain listing; otherwise the filter
    /// endpoint with a parameter per non-empty selection.
    pub fn giveaways_url(&self, filter: &FilterConfig) -> Result<Url, FetchError> {
        if !filter.is_filtered() {
            return self.endpoint(ENDPOINT_GIVEAWAYS);
        }

        let mut url = self.endpoint(ENDPOINT_FILTER)?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(platform) = filter.platform_param() {
                query.append_pair("platform", &platform);
            }
            if let Some(kind) = filter.type_param() {
                query.append_pair("type", &kind);
            }
        }
        Ok(url)
    }

    /// URL of the worth call. The API accepts one platform and one type.
    pub fn worth_url(&self, filter: &FilterConfig) -> Result<Url, FetchError> {
        let mut url = self.endpoint(ENDPOINT_WORTH)?;
        let platform = filter.worth_platform();
        let kind = filter.worth_type();
        if platform.is_some() || kind.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(platform) = platform {
                query.append_pair("platform", platform.key());
            }
            if let Some(kind) = kind {
                query.append_pair("type", kind.key());
            }
        }
        Ok(url)
    }

    /// URL of the single-giveaway lookup.
    pub fn giveaway_url(&self, id: u64) -> Result<Url, FetchError> {
        let mut url = self.endpoint(ENDPOINT_GIVEAWAY)?;
        url.query_pairs_mut().append_pair("id", &id.to_string());
        Ok(url)
    }

    /// GETs a URL and decodes a 200 body. Other statuses give `None`.
    async fn get_ok_json<T: DeserializeOwned>(&self, url: &Url) -> Result<Option<T>, FetchError> {
        let response = self.client.get(url).await?;
        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = %status, "Non-success status");
            return Ok(None);
        }
        let body = self.client.read_body(response).await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

#[async_trait]
impl GiveawaySource for GamerPowerClient {
    #[instrument(skip(self, filter), fields(filtered = filter.is_filtered()))]
    async fn fetch_giveaways(&self, filter: &FilterConfig) -> Result<Vec<Giveaway>, FetchError> {
        let url = self.giveaways_url(filter)?;
        let response = self.client.get(&url).await?;
        let status = response.status();

        match classify_listing(status) {
            ListingStatus::Items => {
                let body = self.client.read_body(response).await?;
                let giveaways: Vec<Giveaway> = serde_json::from_slice(&body)?;
                debug!(count = giveaways.len(), "Giveaways fetched");
                Ok(giveaways)
            }
            ListingStatus::NoContent => {
                debug!(status = %status, "No giveaways available");
                Ok(Vec::new())
            }
            ListingStatus::Unexpected => {
                warn!(status = %status, "Unexpected status from GamerPower API");
                Ok(Vec::new())
            }
        }
    }

    #[instrument(skip(self, filter))]
    async fn fetch_worth(&self, filter: &FilterConfig) -> WorthEstimation {
        let result = match self.worth_url(filter) {
            Ok(url) => self.get_ok_json::<WorthEstimation>(&url).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(Some(worth)) => worth,
            Ok(None) => WorthEstimation::default(),
            Err(e) => {
                debug!(error = %e, "Could not fetch worth data");
                WorthEstimation::default()
            }
        }
    }

    #[instrument(skip(self))]
    async fn fetch_giveaway(&self, id: u64) -> Option<Giveaway> {
        let result = match self.giveaway_url(id) {
            Ok(url) => self.get_ok_json::<Giveaway>(&url).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(giveaway) => giveaway,
            Err(e) => {
                warn!(error = %e, "Error fetching giveaway");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
