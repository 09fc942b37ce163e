// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth credential and connected Google profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth token set authorizing calls to the Google Business APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// When the access token stops being valid. `None` means never checked.
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    /// True once `now` has reached the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| now >= expiry)
    }
}

/// Google account profile captured at connect time (userinfo endpoint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_email: Option<bool>,
    /// Untouched provider payload.
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl ConnectedProfile {
    /// Parse a userinfo response, keeping the full payload alongside the typed fields.
    pub fn from_userinfo(payload: serde_json::Value) -> Result<Self, String> {
        #[derive(Deserialize)]
        struct UserInfo {
            id: Option<String>,
            email: Option<String>,
            name: Option<String>,
            picture: Option<String>,
            verified_email: Option<bool>,
        }

        let info: UserInfo = serde_json::from_value(payload.clone())
            .map_err(|e| format!("Invalid userinfo payload: {}", e))?;
        let email = info
            .email
            .ok_or_else(|| "Userinfo payload has no email address".to_string())?;

        Ok(Self {
            id: info.id,
            email,
            name: info.name,
            picture: info.picture,
            verified_email: info.verified_email,
            raw: payload,
        })
    }
}
