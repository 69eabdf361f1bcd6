//! End-to-end tests for the HTTP surface over the in-memory store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use acara_api::{create_router, AppState};
use acara_core::geo::Boundary;
use acara_core::moderation::{ModerationService, WorkflowPolicy};
use acara_store::MemoryEventStore;

fn app() -> axum::Router {
    let store = MemoryEventStore::new();
    store.seed_category("music");
    store.seed_organizer("Test Organizer", "organizer@test.example");

    let boundary = Arc::new(
        Boundary::from_rings(
            "test-province",
            vec![vec![[110.0, -8.5], [111.0, -8.5], [111.0, -7.0], [110.0, -7.0], [110.0, -8.5]]],
        )
        .unwrap(),
    );

    let store = Arc::new(store);
    let moderation =
        ModerationService::new(store.clone(), boundary.clone(), WorkflowPolicy::default());
    let state = Arc::new(AppState::new(store, boundary, moderation, 2.0));

    create_router(state)
}

fn submission_body() -> Value {
    let start = Utc::now();
    json!({
        "name": "Jazz Night",
        "description": "Open-air jazz",
        "start_date": start.to_rfc3339(),
        "end_date": (start + Duration::hours(4)).to_rfc3339(),
        "location": "Town square",
        "lat": -7.751823562463178,
        "lng": 110.36051135103978,
        "organizer_id": 1,
        "category_id": 1
    })
}

async fn request_json(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let app = app();
    let (status, body) = request_json(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn submit_verify_and_discover() {
    let app = app();

    let (status, body) = request_json(&app, post("/api/v1/events", submission_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "waiting");
    let id = body["event_id"].as_i64().unwrap();

    // Not yet verified, so the public endpoint is empty.
    let (status, body) = request_json(&app, get("/api/v1/events")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");
    assert_eq!(body["features"].as_array().unwrap().len(), 0);

    let (status, _) = request_json(
        &app,
        post(&format!("/api/v1/events/{}/transition", id), json!({"status": "verified"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Verified events appear, with [lng, lat] point geometry.
    let (status, body) = request_json(&app, get("/api/v1/events")).await;
    assert_eq!(status, StatusCode::OK);
    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["type"], "Point");
    assert_eq!(
        features[0]["geometry"]["coordinates"][0].as_f64().unwrap(),
        110.36051135103978
    );
    assert_eq!(features[0]["properties"]["category_name"], "music");

    // Proximity from ~the venue keeps it and reports the distance.
    let (status, body) = request_json(
        &app,
        get("/api/v1/events?lat=-7.7518&lng=110.3605"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert!(features[0]["properties"]["distance"].as_f64().unwrap() < 2.0);
}

#[tokio::test]
async fn malformed_category_is_a_bad_request() {
    let app = app();
    let (status, body) = request_json(&app, get("/api/v1/events?cat=music")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid filter argument");
}

#[tokio::test]
async fn out_of_bounds_submission_is_unprocessable() {
    let app = app();
    let mut body = submission_body();
    body["lat"] = json!(-6.2);
    body["lng"] = json!(106.8);

    let (status, body) = request_json(&app, post("/api/v1/events", body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Submission rejected");
}

#[tokio::test]
async fn illegal_transition_is_a_conflict() {
    let app = app();

    let (_, body) = request_json(&app, post("/api/v1/events", submission_body())).await;
    let id = body["event_id"].as_i64().unwrap();

    let (status, _) = request_json(
        &app,
        post(&format!("/api/v1/events/{}/transition", id), json!({"status": "takedown"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Status unchanged: history still has the single waiting row.
    let (status, body) = request_json(&app, get(&format!("/api/v1/events/{}/history", id))).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "waiting");
}

#[tokio::test]
async fn history_is_newest_first() {
    let app = app();

    let (_, body) = request_json(&app, post("/api/v1/events", submission_body())).await;
    let id = body["event_id"].as_i64().unwrap();

    request_json(
        &app,
        post(&format!("/api/v1/events/{}/transition", id), json!({"status": "verified"})),
    )
    .await;
    request_json(
        &app,
        post(
            &format!("/api/v1/events/{}/transition", id),
            json!({"status": "takedown", "reason": "venue withdrew"}),
        ),
    )
    .await;

    let (_, body) = request_json(&app, get(&format!("/api/v1/events/{}/history", id))).await;
    let statuses: Vec<&str> =
        body.as_array().unwrap().iter().map(|r| r["status"].as_str().unwrap()).collect();
    assert_eq!(statuses, vec!["takedown", "verified", "waiting"]);
}

#[tokio::test]
async fn missing_event_detail_is_not_found() {
    let app = app();
    let (status, _) = request_json(&app, get("/api/v1/events/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn boundary_endpoint_returns_the_province() {
    let app = app();
    let (status, body) = request_json(&app, get("/api/v1/boundary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");
    assert_eq!(body["features"][0]["properties"]["region"], "test-province");
    assert_eq!(body["features"][0]["geometry"]["type"], "Polygon");
}
