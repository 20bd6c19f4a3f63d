mod app_config;
mod config;
pub mod places;
pub mod query;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_PLACES_BASE_URL};
pub use places::{FailureKind, PlaceDetail, PlaceReference, SearchResult, SkippedPlace};
pub use query::{clamp_radius, QueryError, SearchQuery, MAX_RADIUS_METERS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
