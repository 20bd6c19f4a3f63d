//! HTTP client for the Google Places web service.
//!
//! Wraps `reqwest` with API key management, the retry policy, and status
//! classification. Every remote call goes through [`PlacesClient::execute`],
//! which returns a [`RemoteOutcome`] rather than raising transport errors.

use std::time::Duration;

use bizfind_core::{AppConfig, DEFAULT_PLACES_BASE_URL};
use reqwest::{Client, Url};

use crate::error::{PlacesError, RemoteFailure, RemoteOutcome};
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::status::classify;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The two Places endpoints this crate calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    NearbySearch,
    PlaceDetails,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Self::NearbySearch => "maps/api/place/nearbysearch/json",
            Self::PlaceDetails => "maps/api/place/details/json",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::NearbySearch => "nearby_search",
            Self::PlaceDetails => "place_details",
        }
    }
}

/// Fixed waits the Places API requires between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Wait before a `next_page_token` may be used; the API rejects tokens
    /// presented sooner.
    pub page_token_delay: Duration,
    /// Courtesy gap before each follow-up page and each detail lookup.
    pub request_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            page_token_delay: Duration::from_secs(2),
            request_delay: Duration::from_millis(100),
        }
    }
}

impl Pacing {
    /// No waits at all. Only meaningful against a mock server.
    #[must_use]
    pub fn none() -> Self {
        Self {
            page_token_delay: Duration::ZERO,
            request_delay: Duration::ZERO,
        }
    }
}

/// Client for the Places Nearby Search and Place Details endpoints.
///
/// Holds only immutable state, so one instance can be cloned into every
/// request handler. Use [`PlacesClient::new`] for production or
/// [`PlacesClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    pub(crate) retry: RetryPolicy,
    pub(crate) pacing: Pacing,
}

impl PlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout, DEFAULT_PLACES_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("bizfind/0.1 (places-search)")
            .build()?;

        // A trailing slash makes `Url::join` append the endpoint path rather
        // than replace the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(PlacesError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            retry: RetryPolicy::default(),
            pacing: Pacing::default(),
        })
    }

    /// Builds a client from application config. A missing API key is passed
    /// through as empty; the API then answers `REQUEST_DENIED`.
    ///
    /// # Errors
    ///
    /// See [`PlacesClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        let client = Self::with_base_url(
            config.places_api_key.as_deref().unwrap_or_default(),
            config.request_timeout(),
            &config.places_base_url,
        )?;
        Ok(client
            .with_retry_policy(RetryPolicy::new(
                config.max_retries,
                config.backoff_factor,
                Duration::from_secs(1),
            ))
            .with_pacing(Pacing {
                page_token_delay: config.page_token_delay(),
                request_delay: config.request_delay(),
            }))
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    #[must_use]
    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Calls `endpoint` with `params` under the client's retry policy.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteFailure`] once the call is classified terminal or
    /// the retry policy is exhausted.
    pub async fn execute(&self, endpoint: Endpoint, params: &[(&str, &str)]) -> RemoteOutcome {
        self.execute_with_policy(endpoint, params, &self.retry).await
    }

    /// Calls `endpoint` with `params`, retrying transient failures according
    /// to `policy`. The API key is always sent as `key`.
    ///
    /// # Errors
    ///
    /// See [`PlacesClient::execute`].
    pub async fn execute_with_policy(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
        policy: &RetryPolicy,
    ) -> RemoteOutcome {
        let url = self.build_url(endpoint, params)?;
        tracing::debug!(endpoint = endpoint.name(), "calling Places API");
        retry_with_backoff(policy, || self.send_once(&url)).await
    }

    /// Builds the endpoint URL with percent-encoded query parameters, `key`
    /// first.
    pub(crate) fn build_url(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
    ) -> RemoteOutcome<Url> {
        let mut url = self
            .base_url
            .join(endpoint.path())
            .map_err(|e| RemoteFailure::api_error(format!("invalid endpoint URL: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// One GET: any transport fault, non-2xx status, or undecodable body is a
    /// retryable failure; otherwise the `status` field decides.
    async fn send_once(&self, url: &Url) -> RemoteOutcome {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(RemoteFailure::from_transport)?;
        let response = response
            .error_for_status()
            .map_err(RemoteFailure::from_transport)?;
        let body = response
            .text()
            .await
            .map_err(RemoteFailure::from_transport)?;
        let json = serde_json::from_str(&body)
            .map_err(|e| RemoteFailure::network(format!("undecodable response body: {e}")))?;
        classify(json)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
