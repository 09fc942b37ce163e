// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod audit;
pub mod business;
pub mod credential_store;
pub mod directory;
pub mod gemini;
pub mod google;
pub mod oauth_flow;
pub mod token_gate;

pub use audit::{AuditError, AuditService};
pub use business::BusinessService;
pub use credential_store::{ConnectionState, CredentialStore};
pub use gemini::GeminiClient;
pub use google::{GoogleClient, GoogleEndpoints};
pub use oauth_flow::{ConnectionStatus, OAuthFlow};
pub use token_gate::{RefreshPolicy, TokenGate};
