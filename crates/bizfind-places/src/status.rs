//! Classification of the Places API `status` envelope field.

use serde_json::Value;

use crate::error::{RemoteFailure, RemoteOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ApiStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    Other(String),
}

impl ApiStatus {
    fn from_body(body: &Value) -> Self {
        match body.get("status").and_then(Value::as_str) {
            Some("OK") => Self::Ok,
            Some("ZERO_RESULTS") => Self::ZeroResults,
            Some("OVER_QUERY_LIMIT") => Self::OverQueryLimit,
            Some("REQUEST_DENIED") => Self::RequestDenied,
            Some("INVALID_REQUEST") => Self::InvalidRequest,
            Some(other) => Self::Other(other.to_owned()),
            None => Self::Other("UNKNOWN".to_owned()),
        }
    }
}

/// Turns a decoded response body into a success payload or a classified
/// failure. `ZERO_RESULTS` is a success carrying an empty result set.
pub(crate) fn classify(body: Value) -> RemoteOutcome<Value> {
    let status = ApiStatus::from_body(&body);
    let api_message = body
        .get("error_message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty());

    match status {
        ApiStatus::Ok | ApiStatus::ZeroResults => Ok(body),
        ApiStatus::OverQueryLimit => Err(RemoteFailure::rate_limited()),
        ApiStatus::RequestDenied => Err(RemoteFailure::denied(api_message)),
        ApiStatus::InvalidRequest => Err(RemoteFailure::invalid_request(api_message)),
        ApiStatus::Other(raw) => Err(RemoteFailure::api_error(raw)),
    }
}
