// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session validity checking.
//!
//! Expiry is self-healing: the first check that finds an expired record
//! also removes it from the store.

use tracing::{info, warn};

use rocket_core::{LegacySessionPolicy, SessionRecord, SharedClock};

use crate::store::SessionStore;

// =============================================================================
// SessionStatus
// =============================================================================

/// Outcome of a validity check.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    /// No usable session is stored.
    Absent,
    /// The stored session is valid.
    Valid(SessionRecord),
    /// The stored session had expired and has been cleared.
    Expired,
}

impl SessionStatus {
    /// Returns `true` for [`SessionStatus::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns the record if valid.
    pub fn record(&self) -> Option<&SessionRecord> {
        match self {
            Self::Valid(record) => Some(record),
            _ => None,
        }
    }

    /// Consumes the status, returning the record if valid.
    pub fn into_record(self) -> Option<SessionRecord> {
        match self {
            Self::Valid(record) => Some(record),
            _ => None,
        }
    }
}

// =============================================================================
// SessionValidator
// =============================================================================

/// Classifies the stored session against the current time.
#[derive(Debug, Clone)]
pub struct SessionValidator {
    clock: SharedClock,
    legacy_policy: LegacySessionPolicy,
}

impl SessionValidator {
    /// Creates a validator.
    pub fn new(clock: SharedClock, legacy_policy: LegacySessionPolicy) -> Self {
        Self {
            clock,
            legacy_policy,
        }
    }

    /// Returns the clock.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Returns the policy for records without an expiry.
    pub fn legacy_policy(&self) -> LegacySessionPolicy {
        self.legacy_policy
    }

    /// Loads and classifies the stored session, clearing it if expired.
    pub fn check(&self, store: &SessionStore) -> SessionStatus {
        let Some(record) = store.load() else {
            return SessionStatus::Absent;
        };

        let now = self.clock.now_millis();
        let expired = match record.expires_at {
            Some(_) => record.is_expired_at(now),
            None => self.legacy_policy == LegacySessionPolicy::Reject,
        };

        if !expired {
            return SessionStatus::Valid(record);
        }

        info!(
            user_id = %record.user.id,
            expires_at = ?record.expires_at,
            now = now,
            "Session expired, clearing storage"
        );
        if let Err(e) = store.clear() {
            warn!(error = %e, "Failed to clear expired session");
        }
        SessionStatus::Expired
    }

    /// Returns `true` if a valid session is stored.
    pub fn is_valid(&self, store: &SessionStore) -> bool {
        self.check(store).is_valid()
    }
}

// =============================================================================
// Tests
// =============================================================================
