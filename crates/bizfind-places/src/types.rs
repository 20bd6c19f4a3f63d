//! Places API response types for Nearby Search and Place Details.
//!
//! Only the fields this crate reads are modelled; everything else in the
//! payload is ignored. The `status` envelope is checked before these types
//! are decoded (see `status.rs`), so they carry no status field.
//!
//! ### Nearby Search
//! `results` is absent on some `ZERO_RESULTS` bodies, hence `#[serde(default)]`.
//! `next_page_token` appears only when another page exists and becomes valid
//! a couple of seconds after it is issued.
//!
//! ### Place Details
//! Every field in `result` is optional: a listing may lack a phone number,
//! website, rating, or reviews, and the API omits the key rather than sending
//! `null`.

use bizfind_core::PlaceDetail;
use serde::Deserialize;

/// One page of `GET /maps/api/place/nearbysearch/json`.
#[derive(Debug, Deserialize)]
pub struct NearbySearchPage {
    #[serde(default)]
    pub results: Vec<NearbyResult>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyResult {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `GET /maps/api/place/details/json`.
#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResponse {
    #[serde(default)]
    pub result: RawPlaceDetail,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPlaceDetail {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl RawPlaceDetail {
    /// Fills absent fields with empty values. The requested `place_id` is used
    /// when the body does not echo one back.
    #[must_use]
    pub fn into_detail(self, requested_place_id: &str) -> PlaceDetail {
        PlaceDetail {
            place_id: self
                .place_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| requested_place_id.to_owned()),
            name: self.name.unwrap_or_default(),
            formatted_address: self.formatted_address.unwrap_or_default(),
            phone: self.formatted_phone_number.unwrap_or_default(),
            website: self.website.filter(|w| !w.is_empty()),
            user_ratings_total: self.user_ratings_total.unwrap_or(0),
            rating: self.rating.unwrap_or(0.0),
        }
    }
}
