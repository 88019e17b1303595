// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-Based Access Control.
//!
//! Roles arrive from the API as free-form strings. They are parsed into a
//! closed [`Role`] enum and mapped through an exhaustive table, so adding a
//! role is a single compile-checked edit. Anything that does not parse
//! gets the dashboard only.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capability::{Capability, CapabilitySet};

// =============================================================================
// Role
// =============================================================================

/// Known CRM roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including user management.
    Admin,
    /// Sales management: inventory, leads and projects.
    SalesAdmin,
    /// Team lead: inventory and leads.
    TeamLeader,
    /// Sales representative: inventory and leads.
    SalesRep,
}

impl Role {
    /// Returns the role name as stored by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SalesAdmin => "sales_admin",
            Role::TeamLeader => "team_leader",
            Role::SalesRep => "sales_rep",
        }
    }

    /// Parses a role name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "sales_admin" => Some(Role::SalesAdmin),
            "team_leader" => Some(Role::TeamLeader),
            "sales_rep" => Some(Role::SalesRep),
            _ => None,
        }
    }

    /// Returns the capabilities this role grants beyond the dashboard.
    pub fn granted(&self) -> &'static [Capability] {
        match self {
            Role::Admin => &[
                Capability::Users,
                Capability::Inventory,
                Capability::Leads,
                Capability::Projects,
            ],
            Role::SalesAdmin => &[Capability::Inventory, Capability::Leads, Capability::Projects],
            Role::TeamLeader => &[Capability::Inventory, Capability::Leads],
            Role::SalesRep => &[Capability::Inventory, Capability::Leads],
        }
    }

    /// Returns the full capability set for this role.
    pub fn capabilities(&self) -> CapabilitySet {
        std::iter::once(Capability::Dashboard)
            .chain(self.granted().iter().copied())
            .collect()
    }

    /// Returns the human-readable label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::SalesAdmin => "Sales Admin",
            Role::TeamLeader => "Team Leader",
            Role::SalesRep => "Sales Rep",
        }
    }

    /// Returns all roles.
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::SalesAdmin, Role::TeamLeader, Role::SalesRep]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves the capabilities of a role string.
///
/// Total over all inputs: unknown or absent roles get `{dashboard}`.
pub fn capabilities_for(role: Option<&str>) -> CapabilitySet {
    match role.and_then(Role::parse) {
        Some(role) => role.capabilities(),
        None => CapabilitySet::from_capabilities([Capability::Dashboard]),
    }
}

// =============================================================================
// Tests
// =============================================================================
