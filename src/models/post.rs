// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local posts ("What's new" updates) for a location.

use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_language_code() -> String {
    "en-US".to_string()
}

/// Client request body for creating a post.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Post summary is required"))]
    pub summary: String,
    #[serde(default = "default_language_code")]
    pub language_code: String,
    #[serde(default)]
    pub media: Option<Vec<MediaInput>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInput {
    pub source_url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Body sent to `POST .../localPosts`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalPost {
    pub language_code: String,
    pub summary: String,
    pub topic_type: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub media_format: &'static str,
    pub source_url: String,
    pub thumbnail: String,
}

impl From<CreatePostRequest> for LocalPost {
    fn from(req: CreatePostRequest) -> Self {
        let media = req
            .media
            .unwrap_or_default()
            .into_iter()
            .map(|item| MediaItem {
                media_format: "PHOTO",
                thumbnail: item.thumbnail.unwrap_or_else(|| item.source_url.clone()),
                source_url: item.source_url,
            })
            .collect();

        Self {
            language_code: req.language_code,
            summary: req.summary,
            topic_type: "STANDARD",
            media,
        }
    }
}
