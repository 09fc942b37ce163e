// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google integration routes (`/auth/google/...`).

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};
use crate::models::{BusinessLocation, ConnectedProfile, CreatePostRequest};
use crate::services::ConnectionStatus;
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Signed OAuth state older than this is ignored.
const OAUTH_STATE_MAX_AGE_MS: u128 = 60 * 60 * 1000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google/login", get(login))
        .route("/auth/google/google-callback", get(callback))
        .route("/auth/google/status", get(status))
        .route("/auth/google/disconnect", post(disconnect))
        .route("/auth/google/businesses", get(businesses))
        .route(
            "/auth/google/reviews/{account_id}/{location_id}",
            get(reviews),
        )
        .route(
            "/auth/google/accounts/{account_id}/locations/{location_id}/localPosts",
            post(create_post).get(list_posts),
        )
        .route(
            "/auth/google/posts/{account_id}/{location_id}",
            get(list_posts_alt),
        )
}

// ─── OAuth ───────────────────────────────────────────────────

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct LoginParams {
    /// Frontend URL to redirect back to after OAuth completes.
    /// If not provided, uses FRONTEND_URL env var.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start OAuth flow - redirect to the Google consent screen.
async fn login(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LoginParams>,
) -> Result<Redirect> {
    let frontend_url = match params.redirect_uri {
        Some(url) if super::is_allowed_frontend(&state.config, &url) => url,
        Some(url) => {
            tracing::warn!(redirect_uri = %url, "Ignoring unrecognized redirect_uri");
            state.config.frontend_url.clone()
        }
        None => state.config.frontend_url.clone(),
    };

    let oauth_state = sign_state(&frontend_url, &state.config.oauth_state_key)?;
    let auth_url = state.oauth.initiate(&oauth_state).await;

    tracing::info!(
        client_id = %state.config.google_client_id,
        frontend_url = %frontend_url,
        "Starting OAuth flow, redirecting to Google"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// OAuth callback - exchange code for tokens and redirect to the frontend.
///
/// Failures are reported to the frontend in the redirect, never as an
/// error page.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let frontend_url = params
        .state
        .as_deref()
        .and_then(|s| verify_and_decode_state(s, &state.config.oauth_state_key))
        .unwrap_or_else(|| {
            tracing::warn!("Missing or invalid state parameter, using default frontend URL");
            state.config.frontend_url.clone()
        });

    let result = state
        .oauth
        .handle_callback(
            params.code.as_deref(),
            params.error.as_deref(),
            params.error_description.as_deref(),
        )
        .await;

    match result {
        Ok(profile) => {
            tracing::info!(email = %profile.email, "OAuth successful, credentials stored");
            Redirect::temporary(&format!(
                "{}/dashboard/integrations?success=true&user={}",
                frontend_url,
                urlencoding::encode(&profile.email)
            ))
        }
        Err(e) => {
            tracing::error!(error = %e, "OAuth callback failed");
            Redirect::temporary(&format!(
                "{}/integrations?error=true&message={}",
                frontend_url,
                urlencoding::encode(&e.to_string())
            ))
        }
    }
}

/// Sign the frontend URL and current time into an opaque state value.
fn sign_state(frontend_url: &str, secret: &[u8]) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    // Payload: "frontend_url|timestamp_hex"
    let payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify HMAC signature and age, and decode the frontend URL from the state.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"; split from the
    // right so the URL may itself contain '|'.
    let mut parts = state_str.rsplitn(3, '|');
    let signature_hex = parts.next()?;
    let timestamp_hex = parts.next()?;
    let frontend_url = parts.next()?;

    let signature = hex::decode(signature_hex).ok()?;
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(format!("{}|{}", frontend_url, timestamp_hex).as_bytes());

    if mac.verify_slice(&signature).is_err() {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let issued_at = u128::from_str_radix(timestamp_hex, 16).ok()?;
    let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_millis();
    if now.saturating_sub(issued_at) > OAUTH_STATE_MAX_AGE_MS {
        tracing::warn!("OAuth state expired");
        return None;
    }

    Some(frontend_url.to_string())
}

// ─── Status / Disconnect ─────────────────────────────────────

async fn status(State(state): State<Arc<AppState>>) -> Json<ConnectionStatus> {
    Json(state.oauth.status().await)
}

#[derive(Serialize)]
pub struct DisconnectResponse {
    pub message: String,
}

/// Forget the connected account. Safe to call when nothing is connected.
async fn disconnect(State(state): State<Arc<AppState>>) -> Json<DisconnectResponse> {
    let was_connected = state.oauth.disconnect().await;
    tracing::info!(was_connected, "Google OAuth disconnected");

    Json(DisconnectResponse {
        message: "Disconnected successfully".to_string(),
    })
}

// ─── Businesses & Reviews ────────────────────────────────────

#[derive(Serialize)]
pub struct BusinessesResponse {
    pub user: Option<ConnectedProfile>,
    pub businesses: Vec<BusinessLocation>,
}

async fn businesses(State(state): State<Arc<AppState>>) -> Response {
    match state.business.list_businesses().await {
        Ok(directory) => Json(BusinessesResponse {
            user: state.credentials.profile().await,
            businesses: directory.locations,
        })
        .into_response(),
        Err(AppError::NotAuthenticated) => AppError::NotAuthenticated.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching businesses");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "user": state.credentials.profile().await,
                    "businesses": [],
                    "error": e.detail(),
                })),
            )
                .into_response()
        }
    }
}

async fn reviews(
    State(state): State<Arc<AppState>>,
    Path((account_id, location_id)): Path<(String, String)>,
) -> Response {
    match state.business.list_reviews(&account_id, &location_id).await {
        Ok(page) => Json(page).into_response(),
        Err(AppError::NotAuthenticated) => AppError::NotAuthenticated.into_response(),
        Err(e) => {
            tracing::error!(%account_id, %location_id, error = %e, "Error fetching reviews");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "reviews": [], "error": e.detail() })),
            )
                .into_response()
        }
    }
}

// ─── Local Posts ─────────────────────────────────────────────

async fn create_post(
    State(state): State<Arc<AppState>>,
    Path((account_id, location_id)): Path<(String, String)>,
    body: std::result::Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let created = state
        .business
        .create_post(&account_id, &location_id, request)
        .await?;

    Ok(Json(created))
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
    Path((account_id, location_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>> {
    let posts = state.business.list_posts(&account_id, &location_id).await?;
    Ok(Json(posts))
}

/// Older dashboard path for listing posts; failures are always a 500.
async fn list_posts_alt(
    State(state): State<Arc<AppState>>,
    Path((account_id, location_id)): Path<(String, String)>,
) -> Response {
    match state.business.list_posts(&account_id, &location_id).await {
        Ok(posts) => Json(posts).into_response(),
        Err(AppError::NotAuthenticated) => AppError::NotAuthenticated.into_response(),
        Err(e) => {
            tracing::error!(%account_id, %location_id, error = %e, "Error fetching posts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.detail() })),
            )
                .into_response()
        }
    }
}
