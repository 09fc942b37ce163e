// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer-token gate for outbound Google calls.
//!
//! Every outbound operation asks the gate for a token right before the call:
//! 1. No credential stored -> `NotAuthenticated`
//! 2. Expiry absent or in the future -> stored access token, no I/O
//! 3. Expired with a refresh token -> refresh grant, store the new set
//! 4. Expired without a refresh token -> `TokenExpiredNoRefresh`
//!
//! A failed refresh leaves the expired credential in place.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::services::credential_store::CredentialStore;
use crate::services::google::GoogleClient;

/// How many refresh grants the gate may issue for one expired token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    max_attempts: u32,
}

impl RefreshPolicy {
    /// One refresh attempt, no retry.
    pub const SINGLE_ATTEMPT: RefreshPolicy = RefreshPolicy { max_attempts: 1 };

    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::SINGLE_ATTEMPT
    }
}

/// Produces a currently-usable access token from the credential store.
#[derive(Clone)]
pub struct TokenGate {
    store: Arc<CredentialStore>,
    client: GoogleClient,
    policy: RefreshPolicy,
    /// Serializes refresh-and-overwrite across concurrent requests.
    refresh_lock: Arc<Mutex<()>>,
}

impl TokenGate {
    pub fn new(store: Arc<CredentialStore>, client: GoogleClient, policy: RefreshPolicy) -> Self {
        Self {
            store,
            client,
            policy,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Return a valid access token, refreshing once if the stored one expired.
    pub async fn bearer_token(&self) -> Result<String, AppError> {
        let credential = self.store.get().await.ok_or(AppError::NotAuthenticated)?;
        if !credential.is_expired_at(Utc::now()) {
            return Ok(credential.access_token);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another request may have refreshed while we waited for the lock.
        let credential = self.store.get().await.ok_or(AppError::NotAuthenticated)?;
        if !credential.is_expired_at(Utc::now()) {
            return Ok(credential.access_token);
        }

        tracing::info!(
            expired_at = ?credential.expiry,
            "Google access token expired"
        );

        let Some(refresh_token) = credential.refresh_token else {
            tracing::error!("No refresh token available");
            return Err(AppError::TokenExpiredNoRefresh);
        };

        let mut last_error = None;
        for attempt in 1..=self.policy.max_attempts() {
            match self.client.refresh_token(&refresh_token).await {
                Ok(response) => {
                    let refreshed = response.into_credential(Some(refresh_token.clone()));
                    let access_token = refreshed.access_token.clone();

                    if !self.store.replace_credential(refreshed).await {
                        tracing::warn!("Credential cleared during refresh, discarding new token");
                        return Err(AppError::NotAuthenticated);
                    }

                    tracing::info!(attempt, "Google access token refreshed");
                    return Ok(access_token);
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Google token refresh failed");
                    last_error = Some(e);
                }
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no refresh attempt made".to_string());
        Err(AppError::RefreshFailed(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults_to_single_attempt() {
        assert_eq!(RefreshPolicy::default().max_attempts(), 1);
        assert_eq!(RefreshPolicy::with_max_attempts(0).max_attempts(), 1);
        assert_eq!(RefreshPolicy::with_max_attempts(3).max_attempts(), 3);
    }

    #[tokio::test]
    async fn test_empty_store_is_not_authenticated() {
        let store = Arc::new(CredentialStore::new());
        let client = GoogleClient::new(
            "id".to_string(),
            "secret".to_string(),
            "http://localhost/cb".to_string(),
        );
        let gate = TokenGate::new(store, client, RefreshPolicy::default());

        assert!(matches!(
            gate.bearer_token().await,
            Err(AppError::NotAuthenticated)
        ));
    }
}
