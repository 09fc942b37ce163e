// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth and Business Profile API client.
//!
//! Handles:
//! - Authorization-code exchange and refresh grants
//! - Userinfo lookup for the connected account
//! - Account, location, review and local-post endpoints
//!
//! Every call takes the bearer token explicitly; token lifecycle lives in
//! [`crate::services::token_gate`].

use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::location::{AccountList, LocationList};
use crate::models::{Account, BusinessLocation, Credential, LocalPost, ReviewsPage, LOCATION_READ_MASK};

/// Base URLs of every Google endpoint the backend talks to.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub account_management: String,
    pub business_information: String,
    pub my_business: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            account_management: "https://mybusinessaccountmanagement.googleapis.com/v1"
                .to_string(),
            business_information: "https://mybusinessbusinessinformation.googleapis.com/v1"
                .to_string(),
            my_business: "https://mybusiness.googleapis.com/v4".to_string(),
        }
    }
}

impl GoogleEndpoints {
    /// Route every endpoint through one host (mock servers, proxies).
    ///
    /// Paths: `/o/oauth2/v2/auth`, `/token`, `/oauth2/v2/userinfo`,
    /// `/v1/...` for account management and business information,
    /// `/v4/...` for reviews and posts.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            authorize_url: format!("{}/o/oauth2/v2/auth", base),
            token_url: format!("{}/token", base),
            userinfo_url: format!("{}/oauth2/v2/userinfo", base),
            account_management: format!("{}/v1", base),
            business_information: format!("{}/v1", base),
            my_business: format!("{}/v4", base),
        }
    }
}

/// Token endpoint response (both authorization-code and refresh grants).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Convert to a stored credential, computing the absolute expiry now.
    ///
    /// `previous_refresh` is kept when the response carries no refresh token.
    pub fn into_credential(self, previous_refresh: Option<String>) -> Credential {
        Credential {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expiry: self
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }
}

/// Low-level Google API client.
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    endpoints: GoogleEndpoints,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleClient {
    /// Create a new Google client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoints: GoogleEndpoints::default(),
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    pub fn with_endpoints(mut self, endpoints: GoogleEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn endpoints(&self) -> &GoogleEndpoints {
        &self.endpoints
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    // ─── OAuth ───────────────────────────────────────────────────────────────

    /// Exchange an authorization code for a token set.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(&self.endpoints.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::google_transport("Token exchange failed", e))?;

        check_response_json(response).await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(&self.endpoints.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::google_transport("Token refresh request failed", e))?;

        check_response_json(response).await
    }

    /// Get the connected account's profile (raw userinfo payload).
    pub async fn userinfo(&self, access_token: &str) -> Result<serde_json::Value, AppError> {
        self.get_json(&self.endpoints.userinfo_url, access_token, &[])
            .await
    }

    // ─── Business Profile ────────────────────────────────────────────────────

    /// List the accounts the connected identity can manage.
    pub async fn list_accounts(&self, access_token: &str) -> Result<Vec<Account>, AppError> {
        let url = format!("{}/accounts", self.endpoints.account_management);
        let list: AccountList = self.get_json(&url, access_token, &[]).await?;
        Ok(list.accounts)
    }

    /// List one account's locations using the fixed read mask.
    pub async fn list_locations(
        &self,
        access_token: &str,
        account_id: &str,
    ) -> Result<Vec<BusinessLocation>, AppError> {
        let url = format!(
            "{}/accounts/{}/locations",
            self.endpoints.business_information,
            urlencoding::encode(account_id)
        );
        let list: LocationList = self
            .get_json(&url, access_token, &[("readMask", LOCATION_READ_MASK)])
            .await?;
        Ok(list.locations)
    }

    /// First page of reviews for a location.
    pub async fn list_reviews(
        &self,
        access_token: &str,
        account_id: &str,
        location_id: &str,
    ) -> Result<ReviewsPage, AppError> {
        let url = format!(
            "{}/reviews",
            self.location_path(account_id, location_id)
        );
        self.get_json(&url, access_token, &[]).await
    }

    /// Create a local post; returns the provider's representation.
    pub async fn create_local_post(
        &self,
        access_token: &str,
        account_id: &str,
        location_id: &str,
        post: &LocalPost,
    ) -> Result<serde_json::Value, AppError> {
        let url = format!(
            "{}/localPosts",
            self.location_path(account_id, location_id)
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(post)
            .send()
            .await
            .map_err(|e| AppError::google_transport("Create post request failed", e))?;

        check_response_json(response).await
    }

    /// List local posts for a location (provider payload, `{localPosts: [...]}`).
    pub async fn list_local_posts(
        &self,
        access_token: &str,
        account_id: &str,
        location_id: &str,
    ) -> Result<serde_json::Value, AppError> {
        let url = format!(
            "{}/localPosts",
            self.location_path(account_id, location_id)
        );
        self.get_json(&url, access_token, &[]).await
    }

    fn location_path(&self, account_id: &str, location_id: &str) -> String {
        format!(
            "{}/accounts/{}/locations/{}",
            self.endpoints.my_business,
            urlencoding::encode(account_id),
            urlencoding::encode(location_id)
        )
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::google_transport("Google API request failed", e))?;

        check_response_json(response).await
    }
}

/// Check response and parse JSON body.
///
/// Non-success responses keep the provider's status and JSON payload so
/// handlers can pass them through verbatim.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let payload = serde_json::from_str::<serde_json::Value>(&body).ok();

        if status.as_u16() == 429 {
            tracing::warn!("Google API rate limit hit (429)");
        }

        let message = payload
            .as_ref()
            .and_then(|p| {
                p.pointer("/error/message")
                    .or_else(|| p.get("error_description"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP {}: {}", status, body));

        // Non-JSON error bodies are still surfaced, as plain text.
        let payload = payload.or_else(|| (!body.is_empty()).then(|| serde_json::Value::String(body)));

        return Err(AppError::GoogleApi {
            status: Some(status.as_u16()),
            message,
            payload,
        });
    }

    response.json().await.map_err(|e| AppError::GoogleApi {
        status: None,
        message: format!("JSON parse error: {}", e),
        payload: None,
    })
}
