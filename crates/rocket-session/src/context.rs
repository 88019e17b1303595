// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session context.
//!
//! The context is the single owner of session state: the persisted record
//! (through [`SessionStore`]) and the in-memory logged-in flag plus current
//! user. It is passed explicitly to the route guard, the watchdog and the
//! login flow instead of living in globals.
//!
//! # Locking
//!
//! Every mutation (login, logout, watchdog revalidation) runs under the
//! state write lock and replaces or clears the whole record. Validity
//! checks take the read lock, so an expiry clean-up can never interleave
//! with a login that is writing a fresh record.

use std::fmt;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{info, warn};

use rocket_core::{SessionRecord, StoreResult, UserProfile};

use crate::store::SessionStore;
use crate::validity::{SessionStatus, SessionValidator};

// =============================================================================
// LogoutReason
// =============================================================================

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogoutReason {
    /// The user asked to log out.
    UserRequested,
    /// The session expired.
    Expired,
    /// The external API rejected the token.
    Unauthorized,
}

impl LogoutReason {
    /// Returns the reason as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRequested => "user_requested",
            Self::Expired => "expired",
            Self::Unauthorized => "unauthorized",
        }
    }
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Revalidation
// =============================================================================

/// Result of [`SessionContext::revalidate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revalidation {
    /// Nothing changed.
    Unchanged,
    /// The session was found invalid and the context logged out.
    LoggedOut,
}

// =============================================================================
// SessionSnapshot
// =============================================================================

/// Point-in-time copy of the in-memory state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Whether the context considers itself logged in.
    pub logged_in: bool,
    /// The current user, if logged in.
    pub user: Option<UserProfile>,
}

#[derive(Debug, Default)]
struct ContextState {
    logged_in: bool,
    current_user: Option<UserProfile>,
}

// =============================================================================
// SessionContext
// =============================================================================

/// Owner of the session lifecycle.
#[derive(Debug)]
pub struct SessionContext {
    store: SessionStore,
    validator: SessionValidator,
    state: RwLock<ContextState>,
    logged_in_tx: watch::Sender<bool>,
}

impl SessionContext {
    /// Creates a context and restores any valid stored session.
    pub fn new(store: SessionStore, validator: SessionValidator) -> Self {
        let restored = validator.check(&store).into_record();

        let state = match restored {
            Some(record) => {
                info!(user_id = %record.user.id, "Restored stored session");
                ContextState {
                    logged_in: true,
                    current_user: Some(record.user),
                }
            }
            None => ContextState::default(),
        };

        let (logged_in_tx, _) = watch::channel(state.logged_in);

        Self {
            store,
            validator,
            state: RwLock::new(state),
            logged_in_tx,
        }
    }

    /// Returns the session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns the validator.
    pub fn validator(&self) -> &SessionValidator {
        &self.validator
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Classifies the stored session, clearing it if expired.
    pub fn check(&self) -> SessionStatus {
        let _state = self.state.read();
        self.validator.check(&self.store)
    }

    /// Returns `true` if a valid session is stored.
    pub fn is_valid(&self) -> bool {
        self.check().is_valid()
    }

    /// Returns the in-memory logged-in flag.
    pub fn is_logged_in(&self) -> bool {
        self.state.read().logged_in
    }

    /// Returns the current user.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.read().current_user.clone()
    }

    /// Returns the current user's role string.
    pub fn role(&self) -> Option<String> {
        self.state
            .read()
            .current_user
            .as_ref()
            .and_then(|u| u.role.clone())
    }

    /// Returns the bearer token of the valid stored session.
    pub fn token(&self) -> Option<String> {
        self.check().into_record().map(|r| r.issued_token)
    }

    /// Returns a copy of the in-memory state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read();
        SessionSnapshot {
            logged_in: state.logged_in,
            user: state.current_user.clone(),
        }
    }

    /// Subscribes to changes of the logged-in flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.logged_in_tx.subscribe()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Persists `record` and marks the context logged in.
    ///
    /// On a storage failure nothing changes in memory.
    pub fn establish(&self, record: SessionRecord) -> StoreResult<()> {
        let mut state = self.state.write();
        self.store.save(&record)?;

        info!(
            user_id = %record.user.id,
            role = record.role().unwrap_or(""),
            "Session established"
        );
        state.logged_in = true;
        state.current_user = Some(record.user);
        self.logged_in_tx.send_replace(true);
        Ok(())
    }

    /// Clears the session in storage and memory.
    ///
    /// Returns `true` if the context was logged in before the call. The
    /// in-memory state is cleared even if storage removal fails.
    pub fn logout(&self, reason: LogoutReason) -> StoreResult<bool> {
        let mut state = self.state.write();
        let result = self.store.clear();
        let was_logged_in = Self::reset(&mut state);

        if was_logged_in {
            info!(reason = %reason, "Logged out");
            self.logged_in_tx.send_replace(false);
        }
        result.map(|_| was_logged_in)
    }

    /// Handles an unauthorized response from the external API.
    pub fn handle_unauthorized(&self) -> bool {
        match self.logout(LogoutReason::Unauthorized) {
            Ok(was_logged_in) => was_logged_in,
            Err(e) => {
                warn!(error = %e, "Failed to clear session after unauthorized response");
                true
            }
        }
    }

    /// Re-checks validity and logs out if the session is gone while the
    /// context still thinks it is logged in.
    ///
    /// The check and the flip happen under one write lock, so concurrent
    /// callers produce at most one [`Revalidation::LoggedOut`].
    pub fn revalidate(&self) -> Revalidation {
        let mut state = self.state.write();
        if !state.logged_in {
            return Revalidation::Unchanged;
        }
        if self.validator.is_valid(&self.store) {
            return Revalidation::Unchanged;
        }

        Self::reset(&mut state);
        info!(reason = %LogoutReason::Expired, "Logged out");
        self.logged_in_tx.send_replace(false);
        Revalidation::LoggedOut
    }

    fn reset(state: &mut ContextState) -> bool {
        let was_logged_in = state.logged_in;
        state.logged_in = false;
        state.current_user = None;
        was_logged_in
    }
}

// =============================================================================
// Tests
// =============================================================================
