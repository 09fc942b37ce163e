// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `/api/audit` against a mocked Gemini endpoint.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, create_mock_app, post_json};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
}

async fn unused_gemini() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(gemini_reply("{}"))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_empty_reviews_rejected_without_model_call() {
    let server = unused_gemini().await;
    let (app, _state) = create_mock_app(&server.uri());

    let response = app
        .oneshot(post_json(
            "/api/audit",
            json!({ "businessId": "loc-1", "businessName": "Main Street Bakery", "reviews": [] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "No reviews available for analysis" })
    );
}

#[tokio::test]
async fn test_missing_business_name_rejected() {
    let server = unused_gemini().await;
    let (app, _state) = create_mock_app(&server.uri());

    let response = app
        .oneshot(post_json(
            "/api/audit",
            json!({ "businessId": 42, "reviews": [{ "starRating": 5, "comment": "Great" }] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Business ID and name are required"
    );
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let server = unused_gemini().await;
    let (app, _state) = create_mock_app(&server.uri());

    let request = Request::builder()
        .method("POST")
        .uri("/api/audit")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn test_audit_success_fills_missing_fields() {
    let server = MockServer::start().await;
    let model_text = r#"```json
{
  "overallScore": 8.5,
  "summary": "Customers love the pastries but mention slow weekend service.",
  "ratingDistribution": { "5": 1, "2": 1 },
  "sentimentAnalysis": { "positive": "50%", "neutral": "0%", "negative": "50%" },
  "strengths": ["Pastries", "Friendly staff",],
  "weaknesses": ["Weekend wait times"],
  "keyTopics": ["croissants", "service speed"],
  "priorityActions": ["Add a weekend cashier"],
}
```"#;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test_gemini_key"))
        .and(body_string_contains("Main Street Bakery"))
        .respond_with(gemini_reply(model_text))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _state) = create_mock_app(&server.uri());
    let response = app
        .oneshot(post_json(
            "/api/audit",
            json!({
                "businessId": "loc-1",
                "businessName": "Main Street Bakery",
                "reviews": [
                    {
                        "starRating": "FIVE",
                        "comment": "Best croissants in town",
                        "reviewer": { "displayName": "Sam" }
                    },
                    { "starRating": 2, "comment": "Waited 30 minutes on Saturday" }
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["reviewCount"], 2);
    assert!(body["generatedAt"].is_string());

    let audit = &body["audit"];
    assert_eq!(audit["overallScore"], 8.5);
    assert_eq!(audit["strengths"], json!(["Pastries", "Friendly staff"]));
    assert_eq!(audit["businessName"], "Main Street Bakery");
    assert_eq!(audit["reviewCount"], 2);
    // Absent from the model output, so defaulted.
    assert_eq!(audit["recommendations"], json!([]));
    assert!(audit["trendAnalysis"].is_string());
}

#[tokio::test]
async fn test_model_failure_is_503() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let (app, _state) = create_mock_app(&server.uri());
    let response = app
        .oneshot(post_json(
            "/api/audit",
            json!({
                "businessId": "loc-1",
                "businessName": "Main Street Bakery",
                "reviews": [{ "starRating": 4, "comment": "Nice" }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("quota exceeded"));
}

#[tokio::test]
async fn test_unparseable_model_output_is_503() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(gemini_reply("I'm sorry, I can't help with that."))
        .mount(&server)
        .await;

    let (app, _state) = create_mock_app(&server.uri());
    let response = app
        .oneshot(post_json(
            "/api/audit",
            json!({
                "businessId": "loc-1",
                "businessName": "Main Street Bakery",
                "reviews": [{ "starRating": 4, "comment": "Nice" }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse AI analysis response"));
}

#[tokio::test]
async fn test_loosely_typed_model_output_is_returned() {
    let server = MockServer::start().await;
    let model_text = r#"{
  "overallScore": "72",
  "summary": "Solid reviews overall.",
  "keyTopics": [{ "topic": "parking", "mentions": 3 }],
  "ratingDistribution": { "4": 1.0, "5": "1" },
  "reviewThemes": { "service": "mixed" }
}"#;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(gemini_reply(model_text))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _state) = create_mock_app(&server.uri());
    let response = app
        .oneshot(post_json(
            "/api/audit",
            json!({
                "businessId": "loc-1",
                "businessName": "Main Street Bakery",
                "reviews": [{ "starRating": "FOUR", "comment": "Hard to park" }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let audit = &body_json(response).await["audit"];
    assert_eq!(audit["overallScore"], "72");
    assert_eq!(audit["keyTopics"][0]["mentions"], 3);
    assert_eq!(audit["ratingDistribution"]["5"], "1");
    assert_eq!(audit["reviewThemes"], json!({ "service": "mixed" }));
    assert_eq!(audit["weaknesses"], json!([]));
}
