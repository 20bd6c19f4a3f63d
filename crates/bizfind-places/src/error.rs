use bizfind_core::FailureKind;
use thiserror::Error;

/// Errors raised while constructing a [`crate::PlacesClient`].
#[derive(Debug, Error)]
pub enum PlacesError {
    /// The underlying `reqwest::Client` could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// A classified failure of one remote Places API call.
///
/// The `message` is what callers surface to users; its prefix tells a remote
/// API rejection (`Request denied:`, `Invalid request:`, `API error:`) apart
/// from a transport problem (`Network error:`, `Request timed out`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of a remote call: the parsed payload or a classified failure.
pub type RemoteOutcome<T = serde_json::Value> = Result<T, RemoteFailure>;

impl RemoteFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn rate_limited() -> Self {
        Self::new(FailureKind::RateLimited, "Rate limited: OVER_QUERY_LIMIT")
    }

    pub(crate) fn denied(api_message: Option<&str>) -> Self {
        Self::new(
            FailureKind::Denied,
            format!("Request denied: {}", api_message.unwrap_or("Check API key")),
        )
    }

    pub(crate) fn invalid_request(api_message: Option<&str>) -> Self {
        Self::new(
            FailureKind::InvalidRequest,
            format!(
                "Invalid request: {}",
                api_message.unwrap_or("Check parameters")
            ),
        )
    }

    pub(crate) fn api_error(detail: impl std::fmt::Display) -> Self {
        Self::new(FailureKind::UnknownApiError, format!("API error: {detail}"))
    }

    pub(crate) fn timeout() -> Self {
        Self::new(FailureKind::Timeout, "Request timed out")
    }

    pub(crate) fn network(cause: impl std::fmt::Display) -> Self {
        Self::new(FailureKind::NetworkError, format!("Network error: {cause}"))
    }

    pub(crate) fn max_retries_exceeded() -> Self {
        Self::new(FailureKind::UnknownApiError, "Max retries exceeded")
    }

    /// Maps a transport error, stripping the request URL so the API key
    /// never ends up in a message.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout()
        } else {
            Self::network(err.without_url())
        }
    }
}
