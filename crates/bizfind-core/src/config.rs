use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Credentials are optional here: a missing Places key surfaces as a startup
/// warning (see [`AppConfig::missing_credentials`]), not a load failure.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("BIZFIND_ENV", "development"))?;

    let bind_addr = parse_addr("BIZFIND_BIND_ADDR", "127.0.0.1:5000")?;
    let log_level = or_default("BIZFIND_LOG_LEVEL", "info");
    let places_api_key = optional("GOOGLE_PLACES_API_KEY");
    let maps_js_key = optional("GOOGLE_MAPS_JS_KEY");
    let places_base_url = or_default("BIZFIND_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);

    let request_timeout_secs = parse_u64("BIZFIND_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("BIZFIND_MAX_RETRIES", "3")?;
    let backoff_factor = parse_u64("BIZFIND_BACKOFF_FACTOR", "2")?;
    let page_token_delay_ms = parse_u64("BIZFIND_PAGE_TOKEN_DELAY_MS", "2000")?;
    let request_delay_ms = parse_u64("BIZFIND_REQUEST_DELAY_MS", "100")?;

    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BIZFIND_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        places_api_key,
        maps_js_key,
        places_base_url,
        request_timeout_secs,
        max_retries,
        backoff_factor,
        page_token_delay_ms,
        request_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BIZFIND_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
