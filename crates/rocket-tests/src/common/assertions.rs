// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions

use rocket_auth::{Capability, CapabilitySet, GuardDecision, View};
use rocket_session::SessionContext;

// =============================================================================
// Session Assertions
// =============================================================================

/// Assertion extensions for [`SessionContext`].
pub trait SessionAssertions {
    /// Assert that a valid session for a user with `role` is active.
    fn assert_logged_in_as(&self, role: &str);

    /// Assert that nothing is held in memory or storage.
    fn assert_logged_out(&self);
}

impl SessionAssertions for SessionContext {
    fn assert_logged_in_as(&self, role: &str) {
        assert!(self.is_logged_in(), "Expected context to be logged in");
        assert_eq!(
            self.role().as_deref(),
            Some(role),
            "Unexpected in-memory role"
        );
        let record = self
            .store()
            .load()
            .expect("Expected a stored session record");
        assert_eq!(record.role(), Some(role), "Unexpected stored role");
    }

    fn assert_logged_out(&self) {
        assert!(!self.is_logged_in(), "Expected context to be logged out");
        assert!(self.current_user().is_none(), "Expected no current user");
        assert!(
            self.store().load().is_none(),
            "Expected no stored session record"
        );
        assert!(self.store().token().is_none(), "Expected no stored token");
    }
}

// =============================================================================
// Capability Assertions
// =============================================================================

/// Assert that `set` holds exactly `expected`.
pub fn assert_capabilities(set: &CapabilitySet, expected: &[Capability]) {
    let mut expected = expected.to_vec();
    expected.sort();
    assert_eq!(set.sorted(), expected, "Capability set mismatch");
}

/// Assert that a guard decision redirects to `target`.
pub fn assert_redirects_to(decision: GuardDecision, target: View) {
    assert_eq!(
        decision,
        GuardDecision::RedirectTo(target),
        "Expected redirect to {}",
        target
    );
}
