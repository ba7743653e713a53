//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use frightfate_core::clock::Clock;
use frightfate_core::oracle::NarrativeOracle;
use frightfate_core::rng::DeterministicRng;
use frightfate_narrative::application::{NarrativeConfig, NarrativeEngine};
use frightfate_store::InMemorySessionStore;
use frightfate_test_support::{FailingOracle, FixedClock, SequenceRng};
use tower::ServiceExt;

use frightfate_api::routes;
use frightfate_api::state::AppState;

/// Build the full app router over a fresh in-memory store with deterministic
/// Clock/RNG and the given oracle. Uses the same route structure as `main.rs`.
pub fn build_test_app(oracle: Arc<dyn NarrativeOracle>) -> Router {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::standard());
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SequenceRng::new(vec![5, 17, 23, 0, 31, 12, 8])));
    let app_state = AppState::new(
        clock,
        rng,
        Arc::new(InMemorySessionStore::new()),
        NarrativeEngine::new(oracle, NarrativeConfig::default()),
    );

    routes::router().with_state(app_state)
}

/// App whose oracle always fails, so every narrative call takes the fallback.
pub fn build_offline_app() -> Router {
    build_test_app(Arc::new(FailingOracle::default()))
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Create a session and return its code.
pub async fn create_session(app: &Router, theme: Option<&str>) -> String {
    let body = match theme {
        Some(theme) => serde_json::json!({ "theme": theme }),
        None => serde_json::json!({}),
    };
    let (status, json) = post_json(app.clone(), "/api/game/sessions", &body).await;
    assert_eq!(status, StatusCode::OK);
    json["session_code"].as_str().unwrap().to_owned()
}

/// Join a session and return the new player's id.
pub async fn join(app: &Router, code: &str, name: &str) -> String {
    let (status, json) = post_json(
        app.clone(),
        &format!("/api/game/sessions/{code}/players"),
        &serde_json::json!({ "player_name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["id"].as_str().unwrap().to_owned()
}
