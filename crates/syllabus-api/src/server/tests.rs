use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request as HttpRequest;
use contracts::{CharmReading, CharmReadingRequest, NumerologyReading, NumerologyReadingRequest};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;
use crate::{NarrativeService, SilentNarrativeService, SqliteLogStore};

/// Narrative service whose readings never arrive.
struct StalledNarrative;

#[async_trait]
impl NarrativeService for StalledNarrative {
    async fn charm_reading(&self, _request: &CharmReadingRequest) -> Option<CharmReading> {
        std::future::pending::<Option<CharmReading>>().await
    }

    async fn numerology_reading(
        &self,
        _request: &NumerologyReadingRequest,
    ) -> Option<NumerologyReading> {
        std::future::pending::<Option<NumerologyReading>>().await
    }
}

fn router_with(narrative: Arc<dyn NarrativeService>) -> Router {
    let mut api = OracleApi::with_narrative(SyllabusConfig::default(), narrative);
    api.attach_store(SqliteLogStore::open_in_memory().expect("open store"))
        .expect("attach store");
    router(api)
}

fn test_router() -> Router {
    router_with(Arc::new(SilentNarrativeService))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = HttpRequest::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

#[tokio::test]
async fn lost_item_route_returns_result_and_logs_it() {
    let app = test_router();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/lost-item",
        Some(json!({"item_name": "Keys", "date_lost": "2024-01-01"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["master_number"], 7);
    assert_eq!(body["interpretation"]["direction"], "South (Hidden)");

    let (status, logs) = send(&app, "GET", "/api/v1/logs?module=lost_item", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs["module"], "LOST_ITEM");
    assert_eq!(logs["entries"][0]["query"], "Keys (2024-01-01)");
}

#[tokio::test]
async fn blank_item_name_is_invalid_query() {
    let app = test_router();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/lost-item",
        Some(json!({"item_name": "  ", "date_lost": "2024-01-01"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_QUERY");
    assert_eq!(body["details"], "field=item_name");
}

#[tokio::test]
async fn numerology_route_uses_fallback_text() {
    let app = test_router();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/numerology",
        Some(json!({"name": "Anna", "birth_date": "1990-07-04", "scheme": "chaldean"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meaning"], "The numbers are silent.");
    assert_eq!(body["system_comparison"], "Chaldean System");
}

#[tokio::test]
async fn cast_route_accepts_string_seed_and_rejects_empty_intent() {
    let app = test_router();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/casts",
        Some(json!({"intent": "clarity", "seed": "18446744073709551615"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seed"], "18446744073709551615");
    assert_eq!(body["placements"].as_array().map(Vec::len), Some(7));
    assert_eq!(body["landings"], 7);
    assert!(body["reading"].is_null());

    let (status, body) = send(&app, "POST", "/api/v1/casts", Some(json!({"intent": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_QUERY");
}

#[tokio::test]
async fn location_round_trips_and_validates_range() {
    let app = test_router();
    let (status, body) = send(&app, "GET", "/api/v1/location", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["location"].is_null());

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/location",
        Some(json!({"lat": 48.85, "lng": 2.35})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/v1/location", None).await;
    assert_eq!(body["location"], json!({"lat": 48.85, "lng": 2.35}));

    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/location",
        Some(json!({"lat": 123.0, "lng": 0.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_QUERY");
}

#[tokio::test]
async fn status_counts_completed_calculations() {
    let app = test_router();
    send(
        &app,
        "POST",
        "/api/v1/lost-item",
        Some(json!({"item_name": "Ring", "date_lost": "2024-03-15"})),
    )
    .await;
    send(&app, "POST", "/api/v1/casts", Some(json!({"intent": "  "}))).await;

    let (status, body) = send(&app, "GET", "/api/v1/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calculations_run"], 1);
    assert_eq!(body["narrative_enabled"], false);
    assert_eq!(body["schema_version"], SCHEMA_VERSION_V1);
}

#[tokio::test]
async fn preflight_gets_cors_headers() {
    let app = test_router();
    let request = HttpRequest::builder()
        .method("OPTIONS")
        .uri("/api/v1/casts")
        .body(Body::empty())
        .expect("build request");
    let response = app.oneshot(request).await.expect("router response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        HeaderValue::from_static("*")
    );
}

#[tokio::test]
async fn pending_readings_do_not_block_other_routes() {
    let app = router_with(Arc::new(StalledNarrative));

    let cast_app = app.clone();
    let cast = tokio::spawn(async move {
        send(
            &cast_app,
            "POST",
            "/api/v1/casts",
            Some(json!({"intent": "waiting", "seed": 3})),
        )
        .await
    });
    let numerology_app = app.clone();
    let numerology = tokio::spawn(async move {
        send(
            &numerology_app,
            "POST",
            "/api/v1/numerology",
            Some(json!({"name": "Anna", "birth_date": "1990-07-04"})),
        )
        .await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (status, body) = tokio::time::timeout(
        Duration::from_secs(2),
        send(&app, "GET", "/api/v1/status", None),
    )
    .await
    .expect("status answers while readings are pending");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calculations_run"], 0);

    let (status, body) = tokio::time::timeout(
        Duration::from_secs(2),
        send(
            &app,
            "POST",
            "/api/v1/lost-item",
            Some(json!({"item_name": "Keys", "date_lost": "2024-01-01"})),
        ),
    )
    .await
    .expect("lost item answers while readings are pending");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["master_number"], 7);

    assert!(!cast.is_finished());
    assert!(!numerology.is_finished());
    cast.abort();
    numerology.abort();
}
