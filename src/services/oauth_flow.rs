// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth authorization-code flow.
//!
//! `Disconnected -> AuthorizationPending -> Connected`. The credential store
//! is only written after both the code exchange and the userinfo lookup
//! succeed.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::error::AppError;
use crate::models::ConnectedProfile;
use crate::services::credential_store::{ConnectionState, CredentialStore};
use crate::services::google::GoogleClient;
use crate::time_utils::format_utc_rfc3339;

/// Scopes requested on every consent screen.
pub const GOOGLE_SCOPES: [&str; 4] = [
    "https://www.googleapis.com/auth/business.manage",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
    "openid",
];

/// Read-only view of the connection for `/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub authenticated: bool,
    pub user: Option<ConnectedProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
}

#[derive(Clone)]
pub struct OAuthFlow {
    store: Arc<CredentialStore>,
    client: GoogleClient,
}

impl OAuthFlow {
    pub fn new(store: Arc<CredentialStore>, client: GoogleClient) -> Self {
        Self { store, client }
    }

    /// Build the consent-screen URL and mark the flow as pending.
    pub async fn initiate(&self, oauth_state: &str) -> String {
        self.store.mark_pending().await;

        let scope = GOOGLE_SCOPES.join(" ");
        format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}&\
             access_type=offline&\
             prompt=consent&\
             state={}",
            self.client.endpoints().authorize_url,
            urlencoding::encode(self.client.client_id()),
            urlencoding::encode(self.client.redirect_uri()),
            urlencoding::encode(&scope),
            urlencoding::encode(oauth_state)
        )
    }

    /// Handle the provider callback: exchange the code, fetch the profile,
    /// then populate the store.
    pub async fn handle_callback(
        &self,
        code: Option<&str>,
        error: Option<&str>,
        error_description: Option<&str>,
    ) -> Result<ConnectedProfile, AppError> {
        let result = self.complete(code, error, error_description).await;
        if result.is_err() {
            self.store.abort_pending().await;
        }
        result
    }

    async fn complete(
        &self,
        code: Option<&str>,
        error: Option<&str>,
        error_description: Option<&str>,
    ) -> Result<ConnectedProfile, AppError> {
        if let Some(error) = error {
            return Err(AppError::OAuthCallback(format!(
                "OAuth error: {} - {}",
                error,
                error_description.unwrap_or("No description")
            )));
        }

        let code = code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::OAuthCallback("No authorization code received".to_string()))?;

        tracing::info!("Exchanging authorization code for tokens");
        let tokens = self.client.exchange_code(code).await?;
        tracing::info!(
            has_refresh_token = tokens.refresh_token.is_some(),
            expires_in = ?tokens.expires_in,
            "Tokens received"
        );

        let credential = tokens.into_credential(None);
        let userinfo = self.client.userinfo(&credential.access_token).await?;
        let profile = ConnectedProfile::from_userinfo(userinfo).map_err(AppError::OAuthCallback)?;

        self.store.set(credential, profile.clone()).await;
        tracing::info!(email = %profile.email, "Google account connected");

        Ok(profile)
    }

    /// Report the current connection without touching the provider.
    pub async fn status(&self) -> ConnectionStatus {
        match self.store.snapshot().await {
            ConnectionState::Connected {
                credential,
                profile,
            } => ConnectionStatus {
                authenticated: true,
                user: Some(profile),
                expires_at: credential.expiry.map(format_utc_rfc3339),
                expired: credential.expiry.map(|_| credential.is_expired_at(Utc::now())),
            },
            _ => ConnectionStatus {
                authenticated: false,
                user: None,
                expires_at: None,
                expired: None,
            },
        }
    }

    /// Forget the connected account. Returns whether one was connected.
    pub async fn disconnect(&self) -> bool {
        let previous = self.store.snapshot().await;
        self.store.clear().await;

        match previous {
            ConnectionState::Connected { profile, .. } => {
                tracing::info!(email = %profile.email, "Google account disconnected");
                true
            }
            _ => {
                tracing::debug!("Disconnect requested with no connected account");
                false
            }
        }
    }
}
