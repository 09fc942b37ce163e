// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Live pass-through of Google Business data: locations, reviews, posts.
//!
//! Nothing here is cached or persisted. Each operation asks the token gate
//! for a bearer token immediately before its outbound calls.

use validator::Validate;

use crate::error::AppError;
use crate::models::{CreatePostRequest, LocalPost, ReviewsPage};
use crate::services::directory::{self, Directory};
use crate::services::google::GoogleClient;
use crate::services::token_gate::TokenGate;

#[derive(Clone)]
pub struct BusinessService {
    client: GoogleClient,
    gate: TokenGate,
}

impl BusinessService {
    pub fn new(client: GoogleClient, gate: TokenGate) -> Self {
        Self { client, gate }
    }

    /// All locations across all accounts (per-account failures are skipped).
    pub async fn list_businesses(&self) -> Result<Directory, AppError> {
        let token = self.gate.bearer_token().await?;
        directory::aggregate_locations(&self.client, &token).await
    }

    /// First page of reviews for one location.
    pub async fn list_reviews(
        &self,
        account_id: &str,
        location_id: &str,
    ) -> Result<ReviewsPage, AppError> {
        let token = self.gate.bearer_token().await?;
        let page = self
            .client
            .list_reviews(&token, account_id, location_id)
            .await?;

        tracing::info!(
            account_id,
            location_id,
            count = page.reviews.len(),
            "Fetched Google reviews"
        );
        Ok(page)
    }

    /// Create a local post after validating the request body.
    pub async fn create_post(
        &self,
        account_id: &str,
        location_id: &str,
        request: CreatePostRequest,
    ) -> Result<serde_json::Value, AppError> {
        request
            .validate()
            .map_err(|_| AppError::BadRequest("Post summary is required".to_string()))?;

        let token = self.gate.bearer_token().await?;
        let post = LocalPost::from(request);

        tracing::info!(
            account_id,
            location_id,
            summary_len = post.summary.len(),
            media = post.media.len(),
            "Creating local post"
        );

        self.client
            .create_local_post(&token, account_id, location_id, &post)
            .await
    }

    pub async fn list_posts(
        &self,
        account_id: &str,
        location_id: &str,
    ) -> Result<serde_json::Value, AppError> {
        let token = self.gate.bearer_token().await?;
        let posts = self
            .client
            .list_local_posts(&token, account_id, location_id)
            .await?;

        tracing::info!(
            account_id,
            location_id,
            count = posts
                .get("localPosts")
                .and_then(|p| p.as_array())
                .map_or(0, |p| p.len()),
            "Fetched local posts"
        );
        Ok(posts)
    }
}
