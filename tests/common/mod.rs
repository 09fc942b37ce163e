// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Request;
use chrono::{Duration, Utc};
use review_desk::config::Config;
use review_desk::models::{ConnectedProfile, Credential};
use review_desk::routes::create_router;
use review_desk::services::GoogleEndpoints;
use review_desk::AppState;
use serde_json::json;
use std::sync::Arc;

/// Create a test app whose upstreams are unreachable defaults.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default()));
    (create_router(state.clone()), state)
}

/// Create a test app routing every Google and Gemini call to `server_uri`.
#[allow(dead_code)]
pub fn create_mock_app(server_uri: &str) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::with_endpoints(
        Config::test_default(),
        GoogleEndpoints::with_base(server_uri),
        Some(server_uri),
    ));
    (create_router(state.clone()), state)
}

#[allow(dead_code)]
pub fn test_profile() -> ConnectedProfile {
    ConnectedProfile::from_userinfo(json!({
        "id": "1234567890",
        "email": "owner@example.com",
        "name": "Pat Owner",
        "verified_email": true
    }))
    .expect("valid userinfo")
}

/// Store a credential valid for another hour.
#[allow(dead_code)]
pub async fn connect_fresh(state: &AppState, access_token: &str) {
    state
        .credentials
        .set(
            Credential {
                access_token: access_token.to_string(),
                refresh_token: Some("refresh-1".to_string()),
                expiry: Some(Utc::now() + Duration::hours(1)),
            },
            test_profile(),
        )
        .await;
}

/// Store a credential that expired a minute ago.
#[allow(dead_code)]
pub async fn connect_expired(state: &AppState, refresh_token: Option<&str>) {
    state
        .credentials
        .set(
            Credential {
                access_token: "stale-token".to_string(),
                refresh_token: refresh_token.map(str::to_string),
                expiry: Some(Utc::now() - Duration::minutes(1)),
            },
            test_profile(),
        )
        .await;
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
