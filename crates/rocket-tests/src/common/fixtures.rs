// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built users, credentials and API payloads.

use std::time::Duration;

use serde_json::{json, Value};

use rocket_auth::Credentials;
use rocket_core::UserProfile;

/// Wall-clock start for every [`ManualClock`](rocket_core::ManualClock) in tests.
pub const START_MS: i64 = 1_700_000_000_000;

/// One day.
pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Password accepted by [`MockApiClient`](crate::common::MockApiClient) accounts.
pub const API_PASSWORD: &str = "secret";

// =============================================================================
// User Fixtures
// =============================================================================

/// Users for each role.
pub struct UserFixtures;

impl UserFixtures {
    /// A user with `role`.
    pub fn with_role(role: &str) -> UserProfile {
        UserProfile::new(format!("u-{}", role.to_lowercase()))
            .with_name(format!("Test {}", role))
            .with_email(format!("{}@rocketcrm.com", role.to_lowercase()))
            .with_role(role)
    }

    /// An admin.
    pub fn admin() -> UserProfile {
        Self::with_role("admin")
    }

    /// A sales admin.
    pub fn sales_admin() -> UserProfile {
        Self::with_role("sales_admin")
    }

    /// A team leader.
    pub fn team_leader() -> UserProfile {
        Self::with_role("team_leader")
    }

    /// A sales rep.
    pub fn sales_rep() -> UserProfile {
        Self::with_role("sales_rep")
    }

    /// A user the API returned without a role.
    pub fn without_role() -> UserProfile {
        UserProfile::new("u-norole").with_email("norole@rocketcrm.com")
    }
}

// =============================================================================
// Role Fixtures
// =============================================================================

/// Role strings.
pub struct RoleFixtures;

impl RoleFixtures {
    /// Every recognized role.
    pub fn known() -> &'static [&'static str] {
        &["admin", "sales_admin", "team_leader", "sales_rep"]
    }

    /// Strings that must resolve to the dashboard only.
    pub fn unknown() -> &'static [&'static str] {
        &[
            "",
            "guest",
            "superuser",
            "sales-rep",
            "salesadmin",
            "administrator",
            "team leader",
        ]
    }
}

// =============================================================================
// Credential Fixtures
// =============================================================================

/// Login credentials.
pub struct CredentialFixtures;

impl CredentialFixtures {
    /// The built-in demo account.
    pub fn demo() -> Credentials {
        Credentials::new("demo@rocketcrm.com", "demo123")
    }

    /// Credentials accepted by the mock API for `user`.
    pub fn for_user(user: &UserProfile) -> Credentials {
        Credentials::new(user.email.clone().unwrap_or_default(), API_PASSWORD)
    }

    /// Credentials with the wrong password.
    pub fn wrong_password(user: &UserProfile) -> Credentials {
        Credentials::new(user.email.clone().unwrap_or_default(), "wrong")
    }
}

// =============================================================================
// Payload Fixtures
// =============================================================================

/// Collection payloads in the shapes the API returns.
pub struct PayloadFixtures;

impl PayloadFixtures {
    /// `count` items as a bare array.
    pub fn items(count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| json!({ "id": i + 1, "name": format!("item-{}", i + 1) }))
            .collect()
    }

    /// `count` items wrapped under `data`.
    pub fn wrapped(count: usize) -> Value {
        json!({ "data": Self::items(count) })
    }
}
