use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Server-side key for Nearby Search and Place Details.
    pub places_api_key: Option<String>,
    /// Browser key for the map page. Never sent to the Places web service.
    pub maps_js_key: Option<String>,
    pub places_base_url: String,
    pub request_timeout_secs: u64,
    /// Total attempts per remote call, including the first.
    pub max_retries: u32,
    pub backoff_factor: u64,
    pub page_token_delay_ms: u64,
    pub request_delay_ms: u64,
}

impl AppConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn page_token_delay(&self) -> Duration {
        Duration::from_millis(self.page_token_delay_ms)
    }

    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Names of credential env vars that are unset or blank.
    ///
    /// Callers log these as warnings before serving traffic; a missing key
    /// is not fatal at startup.
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.maps_js_key.as_deref().is_none_or(str::is_empty) {
            missing.push("GOOGLE_MAPS_JS_KEY");
        }
        if self.places_api_key.as_deref().is_none_or(str::is_empty) {
            missing.push("GOOGLE_PLACES_API_KEY");
        }
        missing
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "maps_js_key",
                &self.maps_js_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff_factor", &self.backoff_factor)
            .field("page_token_delay_ms", &self.page_token_delay_ms)
            .field("request_delay_ms", &self.request_delay_ms)
            .finish()
    }
}
