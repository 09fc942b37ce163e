// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Business accounts and locations.

use serde::{Deserialize, Serialize};

/// Fields requested from the Business Information API for every location.
pub const LOCATION_READ_MASK: &str =
    "name,title,storeCode,metadata,latlng,phoneNumbers,regularHours";

/// A Google Business account (Account Management API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Resource name, `accounts/{accountId}`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

impl Account {
    /// The bare account id (second segment of the resource name).
    pub fn account_id(&self) -> &str {
        self.name.split('/').nth(1).unwrap_or(&self.name)
    }
}

/// Response envelope of `GET /v1/accounts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountList {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// A single business listing, tagged with its owning account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessLocation {
    /// Resource name, `locations/{locationId}`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latlng: Option<LatLng>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<PhoneNumbers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_hours: Option<BusinessHours>,
    /// Set by the aggregator, never by the provider.
    #[serde(default)]
    pub account_id: String,
    /// Any other provider fields, preserved as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BusinessLocation {
    /// The bare location id (last segment of the resource name).
    pub fn location_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumbers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_phones: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHours {
    #[serde(default)]
    pub periods: Vec<TimePeriod>,
}

/// Opening period; times are kept in the provider's `{hours, minutes}` shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePeriod {
    pub open_day: String,
    #[serde(default)]
    pub open_time: serde_json::Value,
    pub close_day: String,
    #[serde(default)]
    pub close_time: serde_json::Value,
}

/// Response envelope of `GET /v1/accounts/{id}/locations`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationList {
    #[serde(default)]
    pub locations: Vec<BusinessLocation>,
}
