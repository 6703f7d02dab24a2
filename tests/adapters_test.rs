mod common;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{http, spawn};
use street_finder::apis::{ImagesAdapter, PlacesAdapter, RestAdapter, SelectQuery, SpreadsheetAdapter};
use street_finder::config::{ImagesConfig, PlacesConfig, RestConfig, SpreadsheetConfig};
use street_finder::types::{ArtistSource, ImageSource, PlaceSource};
use street_finder::SourceKind;

const TIMEOUT: Duration = Duration::from_secs(5);

// ---- places ----

async fn places_stub(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("fsq-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "bad key" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "results": [{
                "fsq_id": "a",
                "name": format!("{} near {}", params["query"], params["ll"]),
                "location": { "address": "1 St", "neighborhood": ["Downtown"] },
                "limit": params["limit"],
            }]
        })),
    )
}

fn places_adapter(base: &str, key: Option<&str>) -> PlacesAdapter {
    PlacesAdapter::new(
        http(TIMEOUT),
        &PlacesConfig {
            endpoint: format!("{}/v3/places/search", base),
            api_key: key.map(str::to_string),
            ..PlacesConfig::default()
        },
    )
}

#[tokio::test]
async fn test_places_adapter_sends_key_and_query() {
    let base = spawn(Router::new().route("/v3/places/search", get(places_stub)));
    let adapter = places_adapter(&base, Some("fsq-key"));

    let results = adapter.search("43.65%2C-79.38", "coffee", 6).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "coffee near 43.65,-79.38");
    assert_eq!(results[0]["limit"], "6");
}

#[tokio::test]
async fn test_places_adapter_non_success_is_network_error() {
    let base = spawn(Router::new().route("/v3/places/search", get(places_stub)));
    let adapter = places_adapter(&base, Some("wrong-key"));

    let err = adapter.search("43.65,-79.38", "coffee", 6).await.unwrap_err();
    assert_eq!(err.kind(), "network");
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_places_adapter_without_key_is_configuration_missing() {
    let adapter = places_adapter("http://127.0.0.1:9", None);
    let err = adapter.search("43.65,-79.38", "coffee", 6).await.unwrap_err();
    assert_eq!(err.kind(), "configuration_missing");
}

#[tokio::test]
async fn test_places_adapter_missing_results_is_malformed() {
    let base = spawn(Router::new().route(
        "/v3/places/search",
        get(|| async { Json(json!({ "message": "ok" })) }),
    ));
    let err = places_adapter(&base, Some("fsq-key"))
        .search("43.65,-79.38", "coffee", 6)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "malformed_response");
}

#[tokio::test]
async fn test_places_adapter_non_json_is_malformed() {
    let base = spawn(Router::new().route("/v3/places/search", get(|| async { "<html>oops</html>" })));
    let err = places_adapter(&base, Some("fsq-key"))
        .search("43.65,-79.38", "coffee", 6)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "malformed_response");
}

// ---- images ----

async fn images_stub(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    assert_eq!(
        headers.get("authorization").and_then(|v| v.to_str().ok()),
        Some("Client-ID unsplash-key")
    );
    assert_eq!(params["query"], "people");
    let per_page: usize = params["per_page"].parse().unwrap();
    // Return more than asked for to check the adapter caps the page
    let results: Vec<Value> = (0..per_page + 5)
        .map(|i| json!({ "id": format!("p{}", i), "urls": { "small": format!("http://img/{}.jpg", i) } }))
        .collect();
    Json(json!({ "total": 1000, "results": results }))
}

#[tokio::test]
async fn test_images_adapter_returns_first_page_only() {
    let base = spawn(Router::new().route("/search/photos", get(images_stub)));
    let adapter = ImagesAdapter::new(
        http(TIMEOUT),
        &ImagesConfig {
            endpoint: format!("{}/search/photos", base),
            access_key: Some("unsplash-key".into()),
            ..ImagesConfig::default()
        },
    );

    let results = adapter.fetch_images().await.unwrap();
    assert_eq!(results.len(), 30);
    assert_eq!(results[0]["urls"]["small"], "http://img/0.jpg");
}

// ---- spreadsheet ----

fn row(n: usize) -> Value {
    json!({ "id": format!("rec{}", n), "fields": { "id": n.to_string(), "name": format!("Artist {}", n) } })
}

#[derive(Clone)]
struct SheetState {
    requests: Arc<AtomicUsize>,
    fail_on: Option<&'static str>,
}

async fn sheet_stub(
    State(state): State<SheetState>,
    Path((base, table)): Path<(String, String)>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests.fetch_add(1, Ordering::SeqCst);
    assert_eq!(base, "appBase");
    assert_eq!(table, "street-artist-list");
    assert_eq!(
        headers.get("authorization").and_then(|v| v.to_str().ok()),
        Some("Bearer sheet-key")
    );

    if let Some(formula) = params.get("filterByFormula") {
        let records: Vec<Value> = if formula == "id=\"2\"" { vec![row(2)] } else { vec![] };
        return (StatusCode::OK, Json(json!({ "records": records })));
    }

    let offset = params.get("offset").map(String::as_str);
    if offset.is_some() && offset == state.fail_on {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" })));
    }
    let body = match offset {
        None => json!({ "records": [row(1), row(2)], "offset": "p2" }),
        Some("p2") => json!({ "records": [row(3), row(4)], "offset": "p3" }),
        Some("p3") => json!({ "records": [row(5)] }),
        Some(other) => panic!("unexpected offset {}", other),
    };
    (StatusCode::OK, Json(body))
}

fn sheet(fail_on: Option<&'static str>) -> (SpreadsheetAdapter, Arc<AtomicUsize>) {
    let requests = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/v0/:base/:table", get(sheet_stub))
        .with_state(SheetState {
            requests: requests.clone(),
            fail_on,
        });
    let base = spawn(app);
    let adapter = SpreadsheetAdapter::new(
        http(TIMEOUT),
        &SpreadsheetConfig {
            endpoint: format!("{}/v0", base),
            api_key: Some("sheet-key".into()),
            base_id: Some("appBase".into()),
            page_size: 2,
            ..SpreadsheetConfig::default()
        },
    );
    (adapter, requests)
}

#[tokio::test]
async fn test_spreadsheet_pager_drains_every_page() {
    let (adapter, requests) = sheet(None);

    let records = adapter.select(SelectQuery::default()).drain().await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5"]);
    assert_eq!(records[0]["recordId"], "rec1");
    assert_eq!(requests.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_spreadsheet_pager_respects_max_records() {
    let (adapter, requests) = sheet(None);

    let records = adapter
        .select(SelectQuery {
            max_records: Some(3),
            ..SelectQuery::default()
        })
        .drain()
        .await
        .unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_spreadsheet_pager_restarts_from_first_page() {
    let (adapter, _) = sheet(None);
    let mut pager = adapter.select(SelectQuery::default());

    let first = pager.next_page().await.unwrap().unwrap();
    let second = pager.next_page().await.unwrap().unwrap();
    assert_ne!(first, second);

    pager.restart();
    let again = pager.next_page().await.unwrap().unwrap();
    assert_eq!(first, again);
}

#[tokio::test]
async fn test_spreadsheet_mid_pagination_failure_fails_whole_drain() {
    let (adapter, _) = sheet(Some("p3"));

    let err = adapter.select(SelectQuery::default()).drain().await.unwrap_err();
    assert_eq!(err.kind(), "network");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_spreadsheet_failed_page_ends_the_sequence() {
    let (adapter, requests) = sheet(Some("p2"));
    let mut pager = adapter.select(SelectQuery::default());

    assert!(pager.next_page().await.unwrap().is_some());
    assert!(pager.next_page().await.is_err());
    assert!(pager.next_page().await.unwrap().is_none());
    assert_eq!(requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_spreadsheet_artist_page_stops_early() {
    let (adapter, requests) = sheet(None);
    assert_eq!(adapter.source_kind(), SourceKind::Spreadsheet);

    let page_two = adapter.fetch_artists(Some(2)).await.unwrap();
    let ids: Vec<&str> = page_two.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["3", "4"]);
    assert_eq!(requests.load(Ordering::SeqCst), 2);

    assert!(adapter.fetch_artists(Some(7)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_spreadsheet_find_by_id_uses_formula() {
    let (adapter, _) = sheet(None);

    let found = adapter.fetch_artist("2").await.unwrap().unwrap();
    assert_eq!(found["name"], "Artist 2");
    assert!(adapter.fetch_artist("99").await.unwrap().is_none());
}

// ---- REST backend ----

async fn rest_list(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let page = params.get("page").cloned().unwrap_or_else(|| "1".into());
    Json(json!({
        "current_page": page,
        "data": [{ "id": 1, "name": format!("Artist on page {}", page), "category": null }]
    }))
}

async fn rest_item(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "1" => (StatusCode::OK, Json(json!({ "data": { "id": 1, "name": "Lin Wei" } }))),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "Server Error" }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))),
    }
}

fn rest_adapter(base: &str, timeout: Duration) -> RestAdapter {
    RestAdapter::new(http(timeout), &RestConfig { base_url: base.to_string() })
}

#[tokio::test]
async fn test_rest_adapter_returns_data_field() {
    let base = spawn(
        Router::new()
            .route("/api/taipei_artist", get(rest_list))
            .route("/api/taipei_artist/:id", get(rest_item)),
    );
    let adapter = rest_adapter(&base, TIMEOUT);

    let first = adapter.fetch_artists(None).await.unwrap();
    assert_eq!(first[0]["name"], "Artist on page 1");
    let third = adapter.fetch_artists(Some(3)).await.unwrap();
    assert_eq!(third[0]["name"], "Artist on page 3");

    let one = adapter.fetch_artist("1").await.unwrap().unwrap();
    assert_eq!(one["name"], "Lin Wei");
    assert!(adapter.fetch_artist("404").await.unwrap().is_none());
}

#[tokio::test]
async fn test_rest_adapter_500_is_network_error() {
    let base = spawn(
        Router::new()
            .route(
                "/api/taipei_artist",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Server Error") }),
            )
            .route("/api/taipei_artist/:id", get(rest_item)),
    );
    let adapter = rest_adapter(&base, TIMEOUT);

    let err = adapter.fetch_artists(Some(1)).await.unwrap_err();
    assert_eq!(err.kind(), "network");
    assert_eq!(err.status(), Some(500));

    let err = adapter.fetch_artist("boom").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_rest_adapter_unreachable_backend_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = rest_adapter(&format!("http://{}", addr), TIMEOUT)
        .fetch_artists(None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "network");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_slow_backend_is_timeout() {
    let base = spawn(Router::new().route(
        "/api/taipei_artist",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "data": [] }))
        }),
    ));

    let err = rest_adapter(&base, Duration::from_millis(200))
        .fetch_artists(None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "timeout");
}
