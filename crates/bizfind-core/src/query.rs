use serde::Serialize;
use thiserror::Error;

/// Upper bound the Places API accepts for a Nearby Search radius.
pub const MAX_RADIUS_METERS: u32 = 50_000;
pub const DEFAULT_RADIUS_METERS: i64 = 5_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Business query is required")]
    EmptyKeyword,

    #[error("Location coordinates must be finite numbers")]
    NonFiniteCoordinate,
}

/// A validated Nearby Search request.
///
/// Built once per incoming search and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    keyword: String,
    lat: f64,
    lng: f64,
    radius_meters: u32,
    min_reviews: u32,
}

impl SearchQuery {
    /// Builds a query, trimming the keyword and clamping the radius to
    /// `[0, MAX_RADIUS_METERS]`. A negative `min_reviews` is treated as zero.
    ///
    /// # Errors
    ///
    /// - [`QueryError::EmptyKeyword`] if the keyword is blank.
    /// - [`QueryError::NonFiniteCoordinate`] if either coordinate is NaN or infinite.
    pub fn new(
        keyword: &str,
        lat: f64,
        lng: f64,
        radius_meters: i64,
        min_reviews: i64,
    ) -> Result<Self, QueryError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(QueryError::EmptyKeyword);
        }
        if !lat.is_finite() || !lng.is_finite() {
            return Err(QueryError::NonFiniteCoordinate);
        }

        Ok(Self {
            keyword: keyword.to_owned(),
            lat,
            lng,
            radius_meters: clamp_radius(radius_meters),
            min_reviews: u32::try_from(min_reviews.max(0)).unwrap_or(u32::MAX),
        })
    }

    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    #[must_use]
    pub fn radius_meters(&self) -> u32 {
        self.radius_meters
    }

    #[must_use]
    pub fn min_reviews(&self) -> u32 {
        self.min_reviews
    }

    /// The `location` query parameter: `"lat,lng"`.
    #[must_use]
    pub fn location_param(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// Clamps a requested radius into the range the Places API accepts.
#[must_use]
pub fn clamp_radius(radius_meters: i64) -> u32 {
    let clamped = radius_meters.clamp(0, i64::from(MAX_RADIUS_METERS));
    u32::try_from(clamped).unwrap_or(MAX_RADIUS_METERS)
}
