// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single-slot store for the connected Google identity.
//!
//! The backend supports exactly one connected Google account per process;
//! every request reads and writes the same slot. The slot lives in
//! [`crate::AppState`] rather than a global, and is never persisted.

use tokio::sync::RwLock;

use crate::models::{ConnectedProfile, Credential};

/// OAuth connection state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Consent screen issued, callback not yet received.
    AuthorizationPending,
    Connected {
        credential: Credential,
        profile: ConnectedProfile,
    },
}

impl ConnectionState {
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::AuthorizationPending => "authorization_pending",
            ConnectionState::Connected { .. } => "connected",
        }
    }
}

/// Process-wide credential slot. Last writer wins.
#[derive(Debug, Default)]
pub struct CredentialStore {
    slot: RwLock<ConnectionState>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot with a fresh credential and profile.
    pub async fn set(&self, credential: Credential, profile: ConnectedProfile) {
        *self.slot.write().await = ConnectionState::Connected {
            credential,
            profile,
        };
    }

    /// Current credential, if connected.
    pub async fn get(&self) -> Option<Credential> {
        match &*self.slot.read().await {
            ConnectionState::Connected { credential, .. } => Some(credential.clone()),
            _ => None,
        }
    }

    /// Cached profile, if connected.
    pub async fn profile(&self) -> Option<ConnectedProfile> {
        match &*self.slot.read().await {
            ConnectionState::Connected { profile, .. } => Some(profile.clone()),
            _ => None,
        }
    }

    pub async fn snapshot(&self) -> ConnectionState {
        self.slot.read().await.clone()
    }

    /// Reset to `Disconnected`, dropping credential and profile.
    pub async fn clear(&self) {
        *self.slot.write().await = ConnectionState::Disconnected;
    }

    /// Swap in a refreshed credential, keeping the profile.
    ///
    /// Returns false (and stores nothing) if the slot was cleared meanwhile.
    pub async fn replace_credential(&self, credential: Credential) -> bool {
        let mut slot = self.slot.write().await;
        match &mut *slot {
            ConnectionState::Connected {
                credential: current,
                ..
            } => {
                *current = credential;
                true
            }
            _ => false,
        }
    }

    /// `Disconnected -> AuthorizationPending`. A connected slot stays connected.
    pub async fn mark_pending(&self) {
        let mut slot = self.slot.write().await;
        if *slot == ConnectionState::Disconnected {
            *slot = ConnectionState::AuthorizationPending;
        }
    }

    /// `AuthorizationPending -> Disconnected` after a failed callback.
    pub async fn abort_pending(&self) {
        let mut slot = self.slot.write().await;
        if *slot == ConnectionState::AuthorizationPending {
            *slot = ConnectionState::Disconnected;
        }
    }
}
