// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI review audit.
//!
//! Turns a batch of reviews into a prompt, asks Gemini for a JSON audit,
//! then cleans and validates the answer. Missing fields are filled with
//! defaults rather than failing the whole audit.

use std::sync::LazyLock;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use regex::Regex;
use serde_json::{json, Map, Value};
use validator::Validate;

use crate::models::{AuditReport, AuditRequest, AuditResponse, AuditReview};
use crate::services::gemini::{GeminiClient, GenerationConfig};
use crate::time_utils::format_utc_rfc3339;

/// Longest comment excerpt quoted in the prompt, in characters.
const COMMENT_EXCERPT_CHARS: usize = 200;

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[\]}])").expect("Invalid trailing comma regex"));

/// Audit failures, rendered as `{success: false, error}`.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Business ID and name are required")]
    MissingBusiness,

    #[error("No reviews available for analysis")]
    NoReviews,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    Model(String),

    #[error("Failed to parse AI analysis response: {0}")]
    Parse(String),
}

impl IntoResponse for AuditError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuditError::MissingBusiness | AuditError::NoReviews | AuditError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            AuditError::Model(_) | AuditError::Parse(_) => {
                tracing::error!(error = %self, "Audit analysis failed");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        (
            status,
            Json(json!({ "success": false, "error": self.to_string() })),
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct AuditService {
    gemini: GeminiClient,
}

impl AuditService {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    /// Validate the request and produce an audit. No model call is made for
    /// invalid requests or empty review lists.
    pub async fn analyze(&self, request: AuditRequest) -> Result<AuditResponse, AuditError> {
        request
            .validate()
            .map_err(|_| AuditError::MissingBusiness)?;

        let reviews = request.reviews.unwrap_or_default();
        if reviews.is_empty() {
            return Err(AuditError::NoReviews);
        }

        tracing::info!(
            business_id = %request.business_id,
            business_name = %request.business_name,
            review_count = reviews.len(),
            model = %self.gemini.model(),
            "Starting review audit"
        );

        let prompt = build_prompt(&request.business_name, &reviews);
        let text = self
            .gemini
            .generate_text(&prompt, GenerationConfig::default())
            .await
            .map_err(|e| AuditError::Model(e.to_string()))?;

        let generated_at = format_utc_rfc3339(Utc::now());
        let audit = parse_report(&text, &request.business_name, reviews.len(), &generated_at)
            .inspect_err(|_| tracing::debug!(raw = %text, "Unparseable audit response"))?;

        tracing::info!(
            business_id = %request.business_id,
            overall_score = ?audit.overall_score(),
            "Review audit generated"
        );

        Ok(AuditResponse {
            success: true,
            review_count: reviews.len(),
            audit,
            generated_at,
        })
    }
}

/// Build the analysis prompt for a batch of reviews.
pub fn build_prompt(business_name: &str, reviews: &[AuditReview]) -> String {
    let listed: Vec<String> = reviews
        .iter()
        .enumerate()
        .map(|(i, review)| {
            format!(
                "Review {} ({} stars): {}",
                i + 1,
                review.rating_label(),
                excerpt(review.comment.as_deref().unwrap_or(""))
            )
        })
        .collect();

    format!(
        "Analyze these business reviews for {name} and provide a comprehensive audit analysis.
The analysis should include:
1. Overall sentiment and key themes
2. Strengths and areas for improvement
3. Actionable recommendations
4. Sentiment distribution (positive/neutral/negative)
5. Key topics mentioned in reviews

Reviews to analyze ({count} total):
{listed}

Respond ONLY with a valid JSON object, with no explanatory text or markdown formatting. The JSON format must be strictly:
{{
  \"overallScore\": 0-100,
  \"summary\": \"Brief summary of the analysis\",
  \"ratingDistribution\": {{\"1\": 0, \"2\": 0, \"3\": 0, \"4\": 0, \"5\": 0}},
  \"sentimentAnalysis\": {{\"positive\": \"0%\", \"neutral\": \"0%\", \"negative\": \"0%\"}},
  \"strengths\": [\"strength1\", \"strength2\"],
  \"weaknesses\": [\"weakness1\", \"weakness2\"],
  \"keyTopics\": [\"topic1\", \"topic2\"],
  \"trendAnalysis\": \"Analysis of trends over time\",
  \"priorityActions\": [\"action1\", \"action2\"],
  \"recommendations\": [\"recommendation1\", \"recommendation2\"]
}}",
        name = business_name,
        count = reviews.len(),
        listed = listed.join("\n\n")
    )
}

fn excerpt(comment: &str) -> String {
    if comment.chars().count() > COMMENT_EXCERPT_CHARS {
        let head: String = comment.chars().take(COMMENT_EXCERPT_CHARS).collect();
        format!("{}...", head)
    } else {
        comment.to_string()
    }
}

/// Strip Markdown fences and trailing commas from model output.
pub fn clean_model_json(text: &str) -> String {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let without_fences = without_open
        .trim()
        .strip_suffix("```")
        .unwrap_or(without_open.trim())
        .trim();

    TRAILING_COMMA.replace_all(without_fences, "$1").into_owned()
}

/// Default for a field the model left out, `None` for unknown fields.
fn default_for(field: &str) -> Option<Value> {
    Some(match field {
        "overallScore" => Value::Null,
        "ratingDistribution" => json!({ "1": 0, "2": 0, "3": 0, "4": 0, "5": 0 }),
        "sentimentAnalysis" => json!({ "positive": "0%", "neutral": "0%", "negative": "0%" }),
        "strengths" | "weaknesses" | "keyTopics" | "priorityActions" | "recommendations" => {
            json!([])
        }
        "summary" | "trendAnalysis" => Value::String(format!("No {} provided", field)),
        _ => return None,
    })
}

const REQUIRED_FIELDS: [&str; 10] = [
    "overallScore",
    "summary",
    "ratingDistribution",
    "sentimentAnalysis",
    "strengths",
    "weaknesses",
    "keyTopics",
    "trendAnalysis",
    "priorityActions",
    "recommendations",
];

/// Parse cleaned model output into a report, filling in missing fields.
///
/// Values the model did send are kept as-is, whatever their shape.
pub fn parse_report(
    text: &str,
    business_name: &str,
    review_count: usize,
    analyzed_at: &str,
) -> Result<AuditReport, AuditError> {
    let cleaned = clean_model_json(text);
    let mut fields: Map<String, Value> = match serde_json::from_str(&cleaned) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(AuditError::Parse("expected a JSON object".to_string())),
        Err(e) => return Err(AuditError::Parse(e.to_string())),
    };

    for field in REQUIRED_FIELDS {
        if fields.get(field).map_or(true, Value::is_null) {
            tracing::warn!(field, "Missing field in AI audit response");
            if let Some(default) = default_for(field) {
                fields.insert(field.to_string(), default);
            }
        }
    }

    fields.insert("reviewCount".to_string(), json!(review_count));
    fields.insert("analyzedAt".to_string(), json!(analyzed_at));
    fields.insert("businessName".to_string(), json!(business_name));

    serde_json::from_value(Value::Object(fields)).map_err(|e| AuditError::Parse(e.to_string()))
}
