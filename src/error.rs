// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Token expired and no refresh token available")]
    TokenExpiredNoRefresh,

    #[error("Token expired and refresh failed: {0}")]
    RefreshFailed(String),

    /// Provider rejected or aborted the OAuth callback.
    #[error("{0}")]
    OAuthCallback(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Google API error: {message}")]
    GoogleApi {
        status: Option<u16>,
        message: String,
        payload: Option<serde_json::Value>,
    },

    #[error("Gemini API error: {0}")]
    Gemini(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build a `GoogleApi` error from a transport failure (no HTTP status).
    pub fn google_transport(context: &str, err: reqwest::Error) -> Self {
        AppError::GoogleApi {
            status: err.status().map(|s| s.as_u16()),
            message: format!("{}: {}", context, err),
            payload: None,
        }
    }

    /// Upstream HTTP status for provider errors.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::GoogleApi { status, .. } => *status,
            _ => None,
        }
    }

    /// Provider payload if there was one, otherwise the error message.
    pub fn detail(&self) -> serde_json::Value {
        match self {
            AppError::GoogleApi {
                payload: Some(payload),
                ..
            } => payload.clone(),
            AppError::GoogleApi { message, .. } => serde_json::Value::String(message.clone()),
            other => serde_json::Value::String(other.to_string()),
        }
    }

    /// Like [`AppError::detail`], but unwraps Google's `{"error": {...}}` envelope.
    pub fn provider_error_member(&self) -> serde_json::Value {
        let detail = self.detail();
        match detail.get("error") {
            Some(inner) => inner.clone(),
            None => detail,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: serde_json::Value,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AppError::TokenExpiredNoRefresh | AppError::RefreshFailed(_) => {
                tracing::warn!(error = %self, "Google token unavailable");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::OAuthCallback(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::GoogleApi { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::Gemini(msg) => {
                tracing::error!(error = %msg, "Gemini API error");
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let error = match &self {
            AppError::GoogleApi { .. } => self.provider_error_member(),
            AppError::BadRequest(msg) | AppError::OAuthCallback(msg) => {
                serde_json::Value::String(msg.clone())
            }
            AppError::Internal(_) => serde_json::Value::String("Internal server error".to_string()),
            other => serde_json::Value::String(other.to_string()),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
