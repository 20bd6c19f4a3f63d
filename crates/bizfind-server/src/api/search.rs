use std::fmt;

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use bizfind_core::query::DEFAULT_RADIUS_METERS;
use bizfind_core::{PlaceDetail, QueryError, SearchQuery, SearchResult, SkippedPlace};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

/// A JSON number, or a string holding one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum Numeric {
    Number(serde_json::Number),
    Text(String),
}

impl Numeric {
    fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Fractional numbers truncate toward zero; fractional strings are rejected.
    #[allow(clippy::cast_possible_truncation)]
    fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    lat: Option<Numeric>,
    #[serde(default)]
    lng: Option<Numeric>,
    #[serde(default)]
    radius_meters: Option<Numeric>,
    #[serde(default)]
    min_reviews: Option<Numeric>,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum InvalidSearch {
    Query(QueryError),
    MissingCoordinates,
    ParameterTypes,
}

impl fmt::Display for InvalidSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(e) => write!(f, "{e}"),
            Self::MissingCoordinates => f.write_str("Location coordinates are required"),
            Self::ParameterTypes => f.write_str("Invalid parameter types"),
        }
    }
}

impl SearchRequest {
    /// Validates in a fixed order: keyword, coordinate presence, then types.
    pub(super) fn into_query(self) -> Result<SearchQuery, InvalidSearch> {
        let keyword = self.query.unwrap_or_default();
        if keyword.trim().is_empty() {
            return Err(InvalidSearch::Query(QueryError::EmptyKeyword));
        }
        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            return Err(InvalidSearch::MissingCoordinates);
        };

        let lat = lat.to_f64().ok_or(InvalidSearch::ParameterTypes)?;
        let lng = lng.to_f64().ok_or(InvalidSearch::ParameterTypes)?;
        let radius_meters = match self.radius_meters {
            Some(radius) => radius.to_i64().ok_or(InvalidSearch::ParameterTypes)?,
            None => DEFAULT_RADIUS_METERS,
        };
        let min_reviews = match self.min_reviews {
            Some(min) => min.to_i64().ok_or(InvalidSearch::ParameterTypes)?,
            None => 0,
        };

        SearchQuery::new(&keyword, lat, lng, radius_meters, min_reviews).map_err(|e| match e {
            QueryError::NonFiniteCoordinate => InvalidSearch::ParameterTypes,
            other => InvalidSearch::Query(other),
        })
    }
}

/// One accepted business as the browser page renders it.
#[derive(Debug, Serialize, PartialEq)]
pub(super) struct BusinessItem {
    name: String,
    address: String,
    phone: String,
    website: String,
    reviews: u32,
    rating: f64,
    place_id: String,
}

impl From<PlaceDetail> for BusinessItem {
    fn from(detail: PlaceDetail) -> Self {
        Self {
            name: detail.name,
            address: detail.formatted_address,
            phone: detail.phone,
            website: detail.website.unwrap_or_default(),
            reviews: detail.user_ratings_total,
            rating: detail.rating,
            place_id: detail.place_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SearchData {
    results: Vec<BusinessItem>,
    total_found: usize,
    filtered_count: usize,
    skipped: Vec<SkippedPlace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl From<SearchResult> for SearchData {
    fn from(result: SearchResult) -> Self {
        let message = (result.total_found == 0).then_some("No results found");
        Self {
            results: result
                .filtered_places
                .into_iter()
                .map(BusinessItem::from)
                .collect(),
            total_found: result.total_found,
            filtered_count: result.filtered_count,
            skipped: result.skipped,
            message,
        }
    }
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection, "unreadable search request body");
        ApiError::internal(
            req_id.0.clone(),
            format!("Server error: {}", rejection.body_text()),
        )
    })?;

    let query = request
        .into_query()
        .map_err(|e| ApiError::bad_request(req_id.0.clone(), e.to_string()))?;

    let result = state.places.find_businesses(&query).await.map_err(|failure| {
        tracing::error!(
            keyword = query.keyword(),
            kind = %failure.kind,
            error = %failure,
            "business search failed"
        );
        ApiError::internal(req_id.0.clone(), failure.message)
    })?;

    Ok(Json(ApiResponse::new(SearchData::from(result), req_id.0)))
}
