// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI review audit route (`/api/audit`).

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

use crate::models::{AuditRequest, AuditResponse};
use crate::services::AuditError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/audit", post(create_audit))
}

async fn create_audit(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AuditRequest>, JsonRejection>,
) -> Result<Json<AuditResponse>, AuditError> {
    let Json(request) = body.map_err(|e| AuditError::InvalidBody(e.body_text()))?;

    tracing::info!(
        business_id = %request.business_id,
        review_count = request.reviews.as_ref().map_or(0, Vec::len),
        "Received audit request"
    );

    let response = state.audit.analyze(request).await?;
    Ok(Json(response))
}
