// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use std::sync::Arc;
use waxworm_tracker::config::Config;
use waxworm_tracker::db::{LogRepository, MemoryDb};
use waxworm_tracker::routes::create_router;
use waxworm_tracker::AppState;

/// Create a test app backed by the given repository.
#[allow(dead_code)]
pub async fn create_test_app_with(
    config: Config,
    repo: Arc<dyn LogRepository>,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(
        AppState::new(config, repo)
            .await
            .expect("Failed to build test state"),
    );
    (create_router(state.clone()), state)
}

/// Create a test app on in-memory storage.
/// Returns the router, the shared state and the backing store.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MemoryDb>) {
    let db = Arc::new(MemoryDb::new());
    let (app, state) = create_test_app_with(Config::default(), db.clone()).await;
    (app, state, db)
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request without a body.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

/// Collect a response body as text.
#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
