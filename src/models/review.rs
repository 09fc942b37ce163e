// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google-sourced reviews as returned by the My Business v4 API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Star rating enum used by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StarRating {
    StarRatingUnspecified,
    One,
    Two,
    Three,
    Four,
    Five,
    /// Any value we don't know, passed through verbatim.
    #[serde(untagged)]
    Other(String),
}

impl StarRating {
    /// Numeric star count, `None` for unspecified or unknown values.
    pub fn stars(&self) -> Option<u8> {
        match self {
            StarRating::One => Some(1),
            StarRating::Two => Some(2),
            StarRating::Three => Some(3),
            StarRating::Four => Some(4),
            StarRating::Five => Some(5),
            StarRating::StarRatingUnspecified | StarRating::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Owner's reply to a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReply {
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<Reviewer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star_rating: Option<StarRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_reply: Option<ReviewReply>,
    /// Provider fields not modelled above, returned to the caller unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of reviews. `reviews` is always present, even when empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsPage {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_review_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_reviews_page() {
        let raw = json!({
            "reviews": [{
                "reviewId": "r1",
                "reviewer": { "displayName": "Dana" },
                "starRating": "FOUR",
                "comment": "Great coffee",
                "createTime": "2025-03-01T10:00:00Z",
                "reviewReply": { "comment": "Thanks Dana!", "updateTime": "2025-03-02T09:00:00Z" }
            }],
            "averageRating": 4.2,
            "totalReviewCount": 17
        });

        let page: ReviewsPage = serde_json::from_value(raw).unwrap();
        assert_eq!(page.reviews.len(), 1);
        assert_eq!(page.reviews[0].star_rating, Some(StarRating::Four));
        assert_eq!(
            page.reviews[0].star_rating.as_ref().and_then(StarRating::stars),
            Some(4)
        );
        assert_eq!(
            page.reviews[0].review_reply.as_ref().map(|r| r.comment.as_str()),
            Some("Thanks Dana!")
        );
        assert_eq!(page.total_review_count, Some(17));
    }

    #[test]
    fn test_empty_page_serializes_reviews_key() {
        let page: ReviewsPage = serde_json::from_value(json!({})).unwrap();
        let out = serde_json::to_value(&page).unwrap();
        assert_eq!(out, json!({ "reviews": [] }));
    }

    #[test]
    fn test_unmodelled_fields_survive_roundtrip() {
        let raw = json!({
            "reviews": [
                {
                    "reviewId": "r1",
                    "reviewer": { "displayName": "Dana", "isAnonymous": false },
                    "starRating": "FIVE",
                    "reviewReply": {
                        "comment": "thx",
                        "updateTime": "2025-03-02T09:00:00Z",
                        "createTime": "2025-03-02T08:59:00Z"
                    },
                    "languageCode": "en"
                },
                { "reviewId": "r2", "comment": "No stars given" },
                { "reviewId": "r3", "starRating": "SIX" }
            ],
            "totalReviewCount": 3,
            "nextPageToken": "abc",
            "debugInfo": { "shard": 7 }
        });

        let page: ReviewsPage = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(page.reviews.len(), 3);
        assert_eq!(page.reviews[1].star_rating, None);
        assert_eq!(
            page.reviews[2].star_rating,
            Some(StarRating::Other("SIX".to_string()))
        );
        assert_eq!(page.reviews[2].star_rating.as_ref().and_then(StarRating::stars), None);

        let out = serde_json::to_value(&page).unwrap();
        assert_eq!(out, raw);
    }
}
