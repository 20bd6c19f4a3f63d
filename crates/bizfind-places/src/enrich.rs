//! Place Details enrichment and lead filtering.

use bizfind_core::{PlaceDetail, PlaceReference, SearchQuery, SearchResult, SkippedPlace};

use crate::client::{Endpoint, PlacesClient};
use crate::error::{RemoteFailure, RemoteOutcome};
use crate::search::pause;
use crate::types::PlaceDetailsResponse;

/// Fields requested from Place Details.
pub const DETAIL_FIELDS: &str =
    "name,formatted_address,formatted_phone_number,website,user_ratings_total,rating,place_id";

impl PlacesClient {
    /// Fetches the detail record for one place.
    ///
    /// # Errors
    ///
    /// Returns the classified [`RemoteFailure`] from the executor, or an
    /// `UnknownApiError` if the body has an unexpected shape.
    pub async fn place_details(&self, place_id: &str) -> RemoteOutcome<PlaceDetail> {
        let body = self
            .execute(
                Endpoint::PlaceDetails,
                &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
            )
            .await?;
        let response: PlaceDetailsResponse = serde_json::from_value(body).map_err(|e| {
            RemoteFailure::api_error(format!("malformed place details response: {e}"))
        })?;
        Ok(response.result.into_detail(place_id))
    }

    /// Looks up every reference in order and keeps the ones that pass
    /// [`PlaceDetail::passes_filter`].
    ///
    /// A failed lookup never aborts the batch: it is logged and recorded in
    /// [`SearchResult::skipped`], and processing moves on.
    pub async fn enrich_and_filter(
        &self,
        references: &[PlaceReference],
        min_reviews: u32,
    ) -> SearchResult {
        let mut filtered: Vec<PlaceDetail> = Vec::new();
        let mut skipped: Vec<SkippedPlace> = Vec::new();

        for reference in references {
            pause(self.pacing.request_delay).await;

            match self.place_details(&reference.place_id).await {
                Ok(detail) => {
                    if detail.passes_filter(min_reviews) {
                        filtered.push(detail);
                    } else {
                        tracing::trace!(place_id = %detail.place_id, "place rejected by filter");
                    }
                }
                Err(failure) => {
                    tracing::warn!(
                        place_id = %reference.place_id,
                        kind = %failure.kind,
                        error = %failure,
                        "place details lookup failed; skipping place"
                    );
                    skipped.push(SkippedPlace {
                        place_id: reference.place_id.clone(),
                        kind: failure.kind,
                        message: failure.message,
                    });
                }
            }
        }

        SearchResult::new(filtered, references.len(), skipped)
    }

    /// Full pipeline: paginated search, then enrichment and filtering.
    ///
    /// # Errors
    ///
    /// Returns the search-phase [`RemoteFailure`]; enrichment failures are
    /// absorbed into [`SearchResult::skipped`].
    pub async fn find_businesses(&self, query: &SearchQuery) -> RemoteOutcome<SearchResult> {
        let references = self.search(query).await?;
        tracing::info!(
            keyword = query.keyword(),
            radius_meters = query.radius_meters(),
            found = references.len(),
            "nearby search complete"
        );

        let result = self.enrich_and_filter(&references, query.min_reviews()).await;
        tracing::info!(
            total_found = result.total_found,
            filtered_count = result.filtered_count,
            skipped = result.skipped.len(),
            "enrichment complete"
        );
        Ok(result)
    }
}
