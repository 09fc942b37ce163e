// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod audit;
pub mod google;

use crate::config::Config;
use crate::AppState;
use axum::http::{header, Method};
use axum::extract::DefaultBodyLimit;
use axum::{middleware, routing::get, Json, Router};
use reqwest::Url;
use serde::Serialize;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

#[derive(Serialize)]
pub struct ServiceResponse {
    pub status: &'static str,
    pub service: &'static str,
}

async fn service_root() -> Json<ServiceResponse> {
    Json(ServiceResponse {
        status: "ok",
        service: "backend",
    })
}

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 200 * 1024;

/// Whether `origin` is one of our frontends (configured URL/origin or local dev).
///
/// Also used to vet the post-login redirect target, so local dev matches on
/// the parsed host, never on a string prefix.
pub fn is_allowed_frontend(config: &Config, origin: &str) -> bool {
    let origin = origin.trim_end_matches('/');
    origin == config.frontend_url
        || config
            .frontend_origin
            .as_deref()
            .is_some_and(|o| o.trim_end_matches('/') == origin)
        || is_local_dev(origin)
}

fn is_local_dev(origin: &str) -> bool {
    Url::parse(origin).is_ok_and(|url| {
        url.scheme() == "http"
            && url.username().is_empty()
            && matches!(url.host_str(), Some("localhost") | Some("127.0.0.1"))
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from the frontend and localhost (for dev)
    let cors_config = state.config.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                origin
                    .to_str()
                    .is_ok_and(|o| is_allowed_frontend(&cors_config, o))
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(service_root))
        .route("/health", get(health_check))
        .merge(google::routes())
        .merge(audit::routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
