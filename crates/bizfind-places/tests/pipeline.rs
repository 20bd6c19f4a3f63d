//! Integration tests for the paginated search walker and the enrichment
//! pipeline, against a wiremock stand-in for the Places API.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bizfind_core::{FailureKind, PlaceReference, SearchQuery};
use bizfind_places::{Pacing, PlacesClient, RetryPolicy, DETAIL_FIELDS};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const NEARBY_PATH: &str = "/maps/api/place/nearbysearch/json";
const DETAILS_PATH: &str = "/maps/api/place/details/json";

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", Duration::from_secs(5), base_url)
        .expect("client construction should not fail")
        .with_retry_policy(RetryPolicy::new(3, 2, Duration::ZERO))
        .with_pacing(Pacing::none())
}

fn bakery_query() -> SearchQuery {
    SearchQuery::new("bakery", 40.0, -74.0, 5_000, 20).expect("valid query")
}

fn nearby_page(ids: &[&str], next_page_token: Option<&str>) -> Value {
    let results: Vec<Value> = ids.iter().map(|id| json!({ "place_id": id })).collect();
    let mut body = json!({ "status": "OK", "results": results });
    if let Some(token) = next_page_token {
        body["next_page_token"] = json!(token);
    }
    body
}

fn detail_body(place_id: &str, reviews: u32, website: Option<&str>) -> Value {
    let mut result = json!({
        "place_id": place_id,
        "name": format!("Place {place_id}"),
        "formatted_address": "1 Main St",
        "formatted_phone_number": "(555) 010-0000",
        "user_ratings_total": reviews,
        "rating": 4.2
    });
    if let Some(site) = website {
        result["website"] = json!(site);
    }
    json!({ "status": "OK", "result": result })
}

async fn mount_first_page(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_token_page(server: &MockServer, token: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", token))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, place_id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(DETAILS_PATH))
        .and(query_param("place_id", place_id))
        .respond_with(response)
        .mount(server)
        .await;
}

fn ids(references: &[PlaceReference]) -> Vec<&str> {
    references.iter().map(|r| r.place_id.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Search walker
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sends_location_radius_and_keyword_on_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("key", "test-key"))
        .and(query_param("location", "40,-74"))
        .and(query_param("radius", "5000"))
        .and(query_param("keyword", "bakery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nearby_page(&["a", "b"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let references = test_client(&server.uri())
        .search(&bakery_query())
        .await
        .expect("search should succeed");

    assert_eq!(ids(&references), vec!["a", "b"]);
}

#[tokio::test]
async fn search_clamps_radius_before_calling_api() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("radius", "50000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nearby_page(&[], None)))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::new("bakery", 40.0, -74.0, 100_000, 0).unwrap();
    let references = test_client(&server.uri()).search(&query).await.unwrap();

    assert!(references.is_empty());
}

/// Responds with a fixed body and records when each request arrived.
struct TimestampedPage {
    body: Value,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Respond for TimestampedPage {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals
            .lock()
            .expect("arrival log lock")
            .push(Instant::now());
        ResponseTemplate::new(200).set_body_json(self.body.clone())
    }
}

#[tokio::test]
async fn search_follows_page_tokens_in_order_with_mandatory_delay() {
    let server = MockServer::start().await;
    let arrivals = Arc::new(Mutex::new(Vec::new()));
    let page = |body: Value| TimestampedPage {
        body,
        arrivals: Arc::clone(&arrivals),
    };

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(page(nearby_page(&["a", "b"], Some("tok-2"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(page(nearby_page(&["c"], Some("tok-3"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-3"))
        .respond_with(page(nearby_page(&["d", "e"], None)))
        .expect(1)
        .mount(&server)
        .await;

    // Production pacing: 2 s page-token delay plus 100 ms courtesy delay.
    let client = test_client(&server.uri()).with_pacing(Pacing::default());
    let references = client.search(&bakery_query()).await.expect("walk succeeds");

    assert_eq!(ids(&references), vec!["a", "b", "c", "d", "e"]);

    let arrivals = arrivals.lock().expect("arrival log lock").clone();
    assert_eq!(arrivals.len(), 3);
    for (index, pair) in arrivals.windows(2).enumerate() {
        let gap = pair[1].duration_since(pair[0]);
        assert!(
            gap >= Duration::from_secs(2),
            "gap before page {} was {gap:?}",
            index + 2
        );
    }
}

#[tokio::test]
async fn search_follow_up_pages_send_only_token_and_key() {
    let server = MockServer::start().await;

    mount_first_page(&server, nearby_page(&["a"], Some("tok-2"))).await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-2"))
        .and(query_param("key", "test-key"))
        .and(query_param_is_missing("keyword"))
        .and(query_param_is_missing("location"))
        .and(query_param_is_missing("radius"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nearby_page(&["b"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let references = test_client(&server.uri())
        .search(&bakery_query())
        .await
        .unwrap();

    assert_eq!(ids(&references), vec!["a", "b"]);
}

#[tokio::test]
async fn search_page_failure_discards_earlier_pages() {
    let server = MockServer::start().await;

    mount_first_page(&server, nearby_page(&["a", "b"], Some("tok-2"))).await;
    mount_token_page(
        &server,
        "tok-2",
        json!({"status": "INVALID_REQUEST", "error_message": "Invalid page token"}),
    )
    .await;

    let failure = test_client(&server.uri())
        .search(&bakery_query())
        .await
        .expect_err("second page fails");

    assert_eq!(failure.kind, FailureKind::InvalidRequest);
    assert_eq!(failure.message, "Invalid request: Invalid page token");
}

#[tokio::test]
async fn search_keeps_duplicates_and_drops_entries_without_place_id() {
    let server = MockServer::start().await;

    mount_first_page(
        &server,
        json!({
            "status": "OK",
            "results": [
                {"place_id": "a"},
                {"name": "no id here"},
                {"place_id": "a"},
                {"place_id": ""}
            ]
        }),
    )
    .await;

    let references = test_client(&server.uri())
        .search(&bakery_query())
        .await
        .unwrap();

    assert_eq!(ids(&references), vec!["a", "a"]);
}

#[tokio::test]
async fn search_zero_results_yields_empty_list() {
    let server = MockServer::start().await;

    mount_first_page(&server, json!({"status": "ZERO_RESULTS", "results": []})).await;

    let references = test_client(&server.uri())
        .search(&bakery_query())
        .await
        .unwrap();

    assert!(references.is_empty());
}

#[tokio::test]
async fn search_stops_on_cycling_page_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(nearby_page(&["a"], Some("again"))))
        .mount(&server)
        .await;

    let failure = test_client(&server.uri())
        .search(&bakery_query())
        .await
        .expect_err("cycling token must not loop forever");

    assert_eq!(failure.kind, FailureKind::UnknownApiError);
    assert!(failure.message.contains("pagination limit"));
    assert_eq!(server.received_requests().await.unwrap().len(), 10);
}

// ---------------------------------------------------------------------------
// Enrichment and filtering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn place_details_requests_fixed_field_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DETAILS_PATH))
        .and(query_param("place_id", "p1"))
        .and(query_param("fields", DETAIL_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(
            "p1",
            12,
            Some("https://facebook.com/p1"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let detail = test_client(&server.uri())
        .place_details("p1")
        .await
        .expect("details should parse");

    assert_eq!(detail.place_id, "p1");
    assert_eq!(detail.name, "Place p1");
    assert_eq!(detail.phone, "(555) 010-0000");
    assert_eq!(detail.user_ratings_total, 12);
    assert_eq!(detail.website.as_deref(), Some("https://facebook.com/p1"));
}

#[tokio::test]
async fn enrich_and_filter_preserves_order_and_applies_predicate() {
    let server = MockServer::start().await;

    let ok = |body: Value| ResponseTemplate::new(200).set_body_json(body);
    mount_detail(&server, "few", ok(detail_body("few", 5, None))).await;
    mount_detail(&server, "fb", ok(detail_body("fb", 15, Some("http://FACEBOOK.com/x")))).await;
    mount_detail(&server, "site", ok(detail_body("site", 15, Some("http://example.com")))).await;
    mount_detail(&server, "blank", ok(detail_body("blank", 15, Some("")))).await;
    mount_detail(&server, "none", ok(detail_body("none", 15, None))).await;

    let references: Vec<PlaceReference> = ["few", "fb", "site", "blank", "none"]
        .iter()
        .map(|id| PlaceReference {
            place_id: (*id).to_owned(),
        })
        .collect();

    let result = test_client(&server.uri())
        .enrich_and_filter(&references, 10)
        .await;

    let kept: Vec<&str> = result
        .filtered_places
        .iter()
        .map(|p| p.place_id.as_str())
        .collect();
    assert_eq!(kept, vec!["fb", "blank", "none"]);
    assert_eq!(result.total_found, 5);
    assert_eq!(result.filtered_count, 3);
    assert!(result.skipped.is_empty());
}

#[tokio::test]
async fn enrich_and_filter_skips_failed_lookups_without_aborting() {
    let server = MockServer::start().await;

    mount_detail(
        &server,
        "bad",
        ResponseTemplate::new(200).set_body_json(json!({"status": "INVALID_REQUEST"})),
    )
    .await;
    mount_detail(
        &server,
        "good",
        ResponseTemplate::new(200).set_body_json(detail_body("good", 30, None)),
    )
    .await;

    let references = vec![
        PlaceReference {
            place_id: "bad".to_owned(),
        },
        PlaceReference {
            place_id: "good".to_owned(),
        },
    ];

    let result = test_client(&server.uri())
        .enrich_and_filter(&references, 0)
        .await;

    assert_eq!(result.filtered_count, 1);
    assert_eq!(result.filtered_places[0].place_id, "good");
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].place_id, "bad");
    assert_eq!(result.skipped[0].kind, FailureKind::InvalidRequest);
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn find_businesses_bakery_scenario() {
    let server = MockServer::start().await;

    mount_first_page(&server, nearby_page(&["broken", "bakery-1"], None)).await;
    mount_detail(&server, "broken", ResponseTemplate::new(503)).await;
    mount_detail(
        &server,
        "bakery-1",
        ResponseTemplate::new(200).set_body_json(detail_body("bakery-1", 25, Some(""))),
    )
    .await;

    let result = test_client(&server.uri())
        .find_businesses(&bakery_query())
        .await
        .expect("search phase succeeds");

    assert_eq!(result.total_found, 2);
    assert_eq!(result.filtered_count, 1);
    assert_eq!(result.filtered_places[0].place_id, "bakery-1");
    assert!(result
        .filtered_places
        .iter()
        .all(|p| p.place_id != "broken"));
    assert_eq!(result.skipped[0].place_id, "broken");
    assert_eq!(result.skipped[0].kind, FailureKind::NetworkError);
}

#[tokio::test]
async fn find_businesses_is_idempotent_for_unchanged_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(nearby_page(&["x", "y", "z"], None)))
        .mount(&server)
        .await;
    for (id, reviews) in [("x", 40), ("y", 1), ("z", 22)] {
        mount_detail(
            &server,
            id,
            ResponseTemplate::new(200).set_body_json(detail_body(id, reviews, None)),
        )
        .await;
    }

    let client = test_client(&server.uri());
    let first = client.find_businesses(&bakery_query()).await.unwrap();
    let second = client.find_businesses(&bakery_query()).await.unwrap();

    assert_eq!(first.filtered_places, second.filtered_places);
    let kept: Vec<&str> = first
        .filtered_places
        .iter()
        .map(|p| p.place_id.as_str())
        .collect();
    assert_eq!(kept, vec!["x", "z"]);
}

#[tokio::test]
async fn find_businesses_propagates_search_failure() {
    let server = MockServer::start().await;

    mount_first_page(
        &server,
        json!({"status": "REQUEST_DENIED", "error_message": "API key missing"}),
    )
    .await;

    let failure = test_client(&server.uri())
        .find_businesses(&bakery_query())
        .await
        .expect_err("denied search fails the whole request");

    assert_eq!(failure.kind, FailureKind::Denied);
    assert_eq!(failure.message, "Request denied: API key missing");
}
