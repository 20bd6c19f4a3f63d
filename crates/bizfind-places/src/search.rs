//! Multi-page Nearby Search for `PlacesClient`.

use std::time::Duration;

use bizfind_core::{PlaceReference, SearchQuery};

use crate::client::{Endpoint, PlacesClient};
use crate::error::{RemoteFailure, RemoteOutcome};
use crate::types::NearbySearchPage;

/// Maximum number of pages to follow before giving up.
/// The API itself stops at three; this guards against a cycling token.
pub(crate) const MAX_PAGES: usize = 10;

impl PlacesClient {
    /// Runs a Nearby Search and follows `next_page_token` until the last page.
    ///
    /// The first request sends `location`, `radius`, and `keyword`; follow-up
    /// requests send only `pagetoken`. Before each follow-up the client waits
    /// the page-token delay, then the courtesy request delay.
    ///
    /// **All-or-nothing semantics**: if any page fails, references gathered
    /// from earlier pages are discarded and the failure is returned.
    ///
    /// Results without a `place_id` are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first [`RemoteFailure`] from any page, or an
    /// `UnknownApiError` if a page body has an unexpected shape or the page
    /// count exceeds [`MAX_PAGES`].
    pub async fn search(&self, query: &SearchQuery) -> RemoteOutcome<Vec<PlaceReference>> {
        let location = query.location_param();
        let radius = query.radius_meters().to_string();

        let mut references: Vec<PlaceReference> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(RemoteFailure::api_error(format!(
                    "pagination limit exceeded ({MAX_PAGES} pages)"
                )));
            }

            let body = match page_token.as_deref() {
                None => {
                    self.execute(
                        Endpoint::NearbySearch,
                        &[
                            ("location", location.as_str()),
                            ("radius", radius.as_str()),
                            ("keyword", query.keyword()),
                        ],
                    )
                    .await?
                }
                Some(token) => {
                    self.execute(Endpoint::NearbySearch, &[("pagetoken", token)])
                        .await?
                }
            };

            let page: NearbySearchPage = serde_json::from_value(body).map_err(|e| {
                RemoteFailure::api_error(format!("malformed nearby search response: {e}"))
            })?;

            let page_size = page.results.len();
            for result in page.results {
                match result.place_id {
                    Some(place_id) if !place_id.is_empty() => {
                        references.push(PlaceReference { place_id });
                    }
                    _ => tracing::debug!(
                        name = result.name.as_deref().unwrap_or(""),
                        "nearby search result has no place_id; dropping"
                    ),
                }
            }

            page_token = page.next_page_token.filter(|t| !t.is_empty());
            tracing::debug!(
                page = page_count,
                page_size,
                has_next = page_token.is_some(),
                "nearby search page fetched"
            );
            if page_token.is_none() {
                break;
            }

            pause(self.pacing.page_token_delay).await;
            pause(self.pacing.request_delay).await;
        }

        Ok(references)
    }
}

pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
