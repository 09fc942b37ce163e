// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Review audit request and report.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::review::StarRating;

/// Body of `POST /api/audit`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    #[validate(length(min = 1))]
    pub business_id: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub business_name: String,
    #[serde(default)]
    pub reviews: Option<Vec<AuditReview>>,
}

/// A review submitted for analysis. The dashboard forwards whatever it got
/// from Google, so both fields are optional and anything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReview {
    #[serde(default)]
    pub star_rating: Option<Value>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl AuditReview {
    /// Rating as shown in the prompt: `4` for `"FOUR"` or `4`, raw text otherwise.
    pub fn rating_label(&self) -> String {
        match &self.star_rating {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => {
                match serde_json::from_value::<StarRating>(Value::String(s.clone()))
                    .ok()
                    .and_then(|rating| rating.stars())
                {
                    Some(stars) => stars.to_string(),
                    None => s.clone(),
                }
            }
            _ => "unrated".to_string(),
        }
    }
}

/// The model's analysis, kept as the JSON object it returned (after defaults
/// are filled in), plus the fields the server adds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    #[serde(default)]
    pub review_count: usize,
    #[serde(default)]
    pub analyzed_at: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(flatten)]
    pub analysis: Map<String, Value>,
}

impl AuditReport {
    /// `overallScore` as a number, whether the model sent `85` or `"85"`.
    pub fn overall_score(&self) -> Option<f64> {
        match self.analysis.get("overallScore")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
            _ => None,
        }
    }
}

/// Successful `POST /api/audit` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    pub success: bool,
    pub audit: AuditReport,
    pub review_count: usize,
    pub generated_at: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
