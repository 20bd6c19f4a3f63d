use serde::{Deserialize, Serialize};

/// Minimal handle returned by Nearby Search; used to fetch full details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceReference {
    pub place_id: String,
}

/// A place enriched by a Place Details lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetail {
    pub place_id: String,
    pub name: String,
    pub formatted_address: String,
    pub phone: String,
    /// `None` when the listing has no website at all.
    pub website: Option<String>,
    pub user_ratings_total: u32,
    pub rating: f64,
}

impl PlaceDetail {
    /// Whether this place is a lead for the given review threshold.
    ///
    /// A place qualifies when it has at least `min_reviews` reviews and
    /// either no website or only a Facebook page as its website.
    #[must_use]
    pub fn passes_filter(&self, min_reviews: u32) -> bool {
        if self.user_ratings_total < min_reviews {
            return false;
        }
        match self.website.as_deref() {
            None | Some("") => true,
            Some(site) => site.to_lowercase().contains("facebook.com"),
        }
    }
}

/// Classification of a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    RateLimited,
    Timeout,
    NetworkError,
    InvalidRequest,
    Denied,
    UnknownApiError,
}

impl FailureKind {
    /// Transient conditions worth another attempt after a back-off delay.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimited | Self::Timeout | Self::NetworkError)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::RateLimited => "rate_limited",
            Self::Timeout => "timeout",
            Self::NetworkError => "network_error",
            Self::InvalidRequest => "invalid_request",
            Self::Denied => "denied",
            Self::UnknownApiError => "unknown_api_error",
        };
        f.write_str(s)
    }
}

/// A reference dropped from the result because its detail lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPlace {
    pub place_id: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Final output of one search: the accepted places in discovery order plus
/// summary counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub filtered_places: Vec<PlaceDetail>,
    pub total_found: usize,
    pub filtered_count: usize,
    pub skipped: Vec<SkippedPlace>,
}

impl SearchResult {
    #[must_use]
    pub fn new(
        filtered_places: Vec<PlaceDetail>,
        total_found: usize,
        skipped: Vec<SkippedPlace>,
    ) -> Self {
        let filtered_count = filtered_places.len();
        Self {
            filtered_places,
            total_found,
            filtered_count,
            skipped,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, Vec::new())
    }
}

#[cfg(test)]
#[path = "places_test.rs"]
mod tests;
