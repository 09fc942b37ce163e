// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Service-level routes, CORS and response headers.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{body_json, create_test_app, get};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_root_reports_service() {
    let (app, _state) = create_test_app();

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "status": "ok", "service": "backend" })
    );
}

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["build_id"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _state) = create_test_app();

    let response = app.oneshot(get("/auth/google/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_from_frontend() {
    let (app, _state) = create_test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/audit")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let (app, _state) = create_test_app();

    let request = Request::builder()
        .uri("/auth/google/status")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_responses_are_compressed_on_request() {
    let (app, _state) = create_test_app();

    let request = Request::builder()
        .uri("/health")
        .header(header::ACCEPT_ENCODING, "gzip")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_ENCODING).unwrap(), "gzip");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let (app, _state) = create_test_app();

    let comment = "a".repeat(250 * 1024);
    let body = json!({
        "businessId": "loc-1",
        "businessName": "Main Street Bakery",
        "reviews": [{ "starRating": 5, "comment": comment }]
    });
    let response = app
        .oneshot(common::post_json("/api/audit", body))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(body_json(response).await["success"], false);
}
