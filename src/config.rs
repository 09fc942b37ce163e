// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Secrets are injected as environment variables by the deployment (or a
//! local `.env` file) and read once at startup.

use std::env;

const DEFAULT_REDIRECT_URI: &str = "http://localhost:8000/auth/google/google-callback";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Google OAuth client ID (public)
    pub google_client_id: String,
    /// OAuth redirect URI registered with Google
    pub google_redirect_uri: String,
    /// Frontend URL for post-auth redirects
    pub frontend_url: String,
    /// Extra origin allowed by CORS (defaults to none)
    pub frontend_origin: Option<String>,
    /// Gemini model used for review audits
    pub gemini_model: String,
    /// Attempts the token gate makes per expired-token refresh
    pub refresh_attempts: u32,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Gemini API key
    pub gemini_api_key: String,
    /// HMAC key used to sign the OAuth `state` parameter (raw bytes)
    pub oauth_state_key: Vec<u8>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test_client_id".to_string(),
            google_redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            frontend_origin: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            refresh_attempts: 1,
            port: 8000,
            google_client_secret: "test_secret".to_string(),
            gemini_api_key: "test_gemini_key".to_string(),
            oauth_state_key: b"test_state_key_32_bytes_minimum!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            google_client_id: required("GOOGLE_CLIENT_ID")?,
            google_redirect_uri: env::var("GOOGLE_REDIRECT_URI")
                .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            refresh_attempts: match env::var("GOOGLE_REFRESH_ATTEMPTS") {
                Ok(raw) => raw
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or(ConfigError::Invalid("GOOGLE_REFRESH_ATTEMPTS"))?,
                Err(_) => 1,
            },
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),

            google_client_secret: required("GOOGLE_CLIENT_SECRET")?,
            gemini_api_key: required("GEMINI_API_KEY")?,
            oauth_state_key: required("JWT_SECRET")?.into_bytes(),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
