// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session persistence.
//!
//! A session occupies two storage keys:
//!
//! | Key (default) | Content |
//! |---|---|
//! | `user` | JSON of the user's attributes plus `expirationTime` (ms) |
//! | `token` | raw bearer token |
//!
//! Both keys are written on save and removed together on clear. A read
//! that finds only one of them, or a `user` value that does not parse,
//! yields no session.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rocket_core::{SessionRecord, StoreError, StoreResult, UserProfile};

use crate::storage::Storage;

// =============================================================================
// StorageKeys
// =============================================================================

/// Storage key names used by the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Key holding the serialized user.
    pub user: String,
    /// Key holding the bearer token.
    pub token: String,
}

impl StorageKeys {
    /// Creates custom key names.
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new("user", "token")
    }
}

// =============================================================================
// StoredUser
// =============================================================================

/// Wire form of the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    /// User attributes, flattened into the top-level object.
    #[serde(flatten)]
    pub user: UserProfile,

    /// Expiry in milliseconds since the Unix epoch.
    #[serde(
        rename = "expirationTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_time: Option<i64>,
}

// =============================================================================
// SessionStore
// =============================================================================

/// Reads and writes the session record through a [`Storage`] backend.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    keys: StorageKeys,
}

impl SessionStore {
    /// Creates a store with the default key names.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_keys(storage, StorageKeys::default())
    }

    /// Creates a store with custom key names.
    pub fn with_keys(storage: Arc<dyn Storage>, keys: StorageKeys) -> Self {
        Self { storage, keys }
    }

    /// Returns the key names.
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Returns the underlying backend.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Persists `record`, replacing whatever was stored.
    ///
    /// If the token cannot be written the user key is removed again so the
    /// store never holds half a session.
    pub fn save(&self, record: &SessionRecord) -> StoreResult<()> {
        let stored = StoredUser {
            user: record.user.clone(),
            expiration_time: record.expires_at,
        };
        let json = serde_json::to_string(&stored)
            .map_err(|e| StoreError::serialization(&self.keys.user, e.to_string()))?;

        self.storage.set(&self.keys.user, &json)?;
        if let Err(e) = self.storage.set(&self.keys.token, &record.issued_token) {
            let _ = self.storage.remove(&self.keys.user);
            return Err(e);
        }

        debug!(
            user_id = %record.user.id,
            expires_at = ?record.expires_at,
            backend = self.storage.name(),
            "Session saved"
        );
        Ok(())
    }

    /// Returns the stored session, or `None` if there is no complete,
    /// readable record.
    pub fn load(&self) -> Option<SessionRecord> {
        let raw_user = self.read_key(&self.keys.user)?;

        let stored: StoredUser = match serde_json::from_str(&raw_user) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, key = %self.keys.user, "Ignoring malformed stored session");
                return None;
            }
        };

        let token = match self.read_key(&self.keys.token) {
            Some(token) if !token.is_empty() => token,
            _ => {
                debug!(user_id = %stored.user.id, "Stored session has no token, treating as absent");
                return None;
            }
        };

        Some(SessionRecord::new(stored.user, token, stored.expiration_time))
    }

    /// Returns the stored bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.read_key(&self.keys.token).filter(|t| !t.is_empty())
    }

    /// Removes the session. Clearing an empty store is a no-op.
    ///
    /// Both keys are always attempted; the first failure is returned.
    pub fn clear(&self) -> StoreResult<()> {
        let user = self.storage.remove(&self.keys.user);
        let token = self.storage.remove(&self.keys.token);
        user.and(token)?;

        debug!(backend = self.storage.name(), "Session cleared");
        Ok(())
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, key = %key, "Failed to read session storage");
                None
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
