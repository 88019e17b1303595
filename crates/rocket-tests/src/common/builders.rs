// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Builders for session records and for writing raw payloads straight into
//! storage, bypassing [`SessionStore`](rocket_session::SessionStore).

use std::time::Duration;

use rocket_core::{SessionRecord, UserProfile};
use rocket_session::{Storage, StorageKeys};

use super::fixtures::{UserFixtures, DAY, START_MS};

// =============================================================================
// SessionRecordBuilder
// =============================================================================

/// Builder for [`SessionRecord`].
///
/// Defaults to an admin session expiring one day after [`START_MS`].
#[derive(Debug, Clone)]
pub struct SessionRecordBuilder {
    user: UserProfile,
    token: String,
    expires_at: Option<i64>,
}

impl Default for SessionRecordBuilder {
    fn default() -> Self {
        Self {
            user: UserFixtures::admin(),
            token: "token-abc".to_string(),
            expires_at: Some(START_MS + DAY.as_millis() as i64),
        }
    }
}

impl SessionRecordBuilder {
    /// Creates a builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the user.
    pub fn user(mut self, user: UserProfile) -> Self {
        self.user = user;
        self
    }

    /// Replaces the user with a fixture for `role`.
    pub fn role(mut self, role: &str) -> Self {
        self.user = UserFixtures::with_role(role);
        self
    }

    /// Sets the token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Sets an absolute expiry.
    pub fn expires_at(mut self, expires_at: i64) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Expires `after` [`START_MS`].
    pub fn expires_after_start(self, after: Duration) -> Self {
        self.expires_at(START_MS + after.as_millis() as i64)
    }

    /// Expired `before` [`START_MS`].
    pub fn expired_before_start(self, before: Duration) -> Self {
        self.expires_at(START_MS - before.as_millis() as i64)
    }

    /// Removes the expiry.
    pub fn legacy(mut self) -> Self {
        self.expires_at = None;
        self
    }

    /// Builds the record.
    pub fn build(self) -> SessionRecord {
        SessionRecord::new(self.user, self.token, self.expires_at)
    }
}

// =============================================================================
// Raw storage seeding
// =============================================================================

/// Writes raw strings under the session keys.
pub struct StorageSeeder<'a> {
    storage: &'a dyn Storage,
    keys: StorageKeys,
}

impl<'a> StorageSeeder<'a> {
    /// Seeds `storage` under the default keys.
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self {
            storage,
            keys: StorageKeys::default(),
        }
    }

    /// Writes `raw` under the user key.
    pub fn user_json(self, raw: &str) -> Self {
        self.storage
            .set(&self.keys.user, raw)
            .expect("seed user key");
        self
    }

    /// Writes `token` under the token key.
    pub fn token(self, token: &str) -> Self {
        self.storage
            .set(&self.keys.token, token)
            .expect("seed token key");
        self
    }
}
