// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Review Desk: Google Business Profile reviews for business owners
//!
//! This crate provides the backend API that connects a Google Business
//! account over OAuth, lists its locations, reviews and posts, and produces
//! AI audits of review batches.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use services::{
    AuditService, BusinessService, CredentialStore, GeminiClient, GoogleClient, GoogleEndpoints,
    OAuthFlow, RefreshPolicy, TokenGate,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// The single connected Google identity (shared by every request).
    pub credentials: Arc<CredentialStore>,
    pub oauth: OAuthFlow,
    pub business: BusinessService,
    pub audit: AuditService,
}

impl AppState {
    /// Build state talking to the real Google and Gemini endpoints.
    pub fn new(config: Config) -> Self {
        Self::with_endpoints(config, GoogleEndpoints::default(), None)
    }

    /// Build state with overridden upstream endpoints.
    pub fn with_endpoints(
        config: Config,
        endpoints: GoogleEndpoints,
        gemini_base_url: Option<&str>,
    ) -> Self {
        let credentials = Arc::new(CredentialStore::new());

        let google = GoogleClient::new(
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
            config.google_redirect_uri.clone(),
        )
        .with_endpoints(endpoints);

        let gate = TokenGate::new(
            credentials.clone(),
            google.clone(),
            RefreshPolicy::with_max_attempts(config.refresh_attempts),
        );

        let mut gemini = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
        if let Some(base_url) = gemini_base_url {
            gemini = gemini.with_base_url(base_url);
        }

        Self {
            oauth: OAuthFlow::new(credentials.clone(), google.clone()),
            business: BusinessService::new(google, gate),
            audit: AuditService::new(gemini),
            credentials,
            config,
        }
    }
}
