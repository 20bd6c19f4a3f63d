//! Google Places client: resilient request execution, paginated Nearby
//! Search, and Place Details enrichment with lead filtering.

pub mod client;
pub mod enrich;
pub mod error;
pub mod retry;
pub mod search;
mod status;
pub mod types;

pub use client::{Endpoint, Pacing, PlacesClient, DEFAULT_TIMEOUT};
pub use enrich::DETAIL_FIELDS;
pub use error::{PlacesError, RemoteFailure, RemoteOutcome};
pub use retry::RetryPolicy;
