// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Capability definitions.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named permission gating one dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Dashboard overview. Every authenticated session has it.
    Dashboard,
    /// User management.
    Users,
    /// Inventory listing.
    Inventory,
    /// Leads listing.
    Leads,
    /// Projects listing.
    Projects,
}

impl Capability {
    /// Returns the capability name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Dashboard => "dashboard",
            Capability::Users => "users",
            Capability::Inventory => "inventory",
            Capability::Leads => "leads",
            Capability::Projects => "projects",
        }
    }

    /// Parses a capability name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dashboard" => Some(Capability::Dashboard),
            "users" => Some(Capability::Users),
            "inventory" => Some(Capability::Inventory),
            "leads" => Some(Capability::Leads),
            "projects" => Some(Capability::Projects),
            _ => None,
        }
    }

    /// Returns all capabilities.
    pub fn all() -> &'static [Capability] {
        &[
            Capability::Dashboard,
            Capability::Users,
            Capability::Inventory,
            Capability::Leads,
            Capability::Projects,
        ]
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Capability Set
// =============================================================================

/// A set of capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    capabilities: HashSet<Capability>,
}

impl CapabilitySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from a list of capabilities.
    pub fn from_capabilities(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// Adds a capability.
    pub fn add(&mut self, capability: Capability) {
        self.capabilities.insert(capability);
    }

    /// Returns `true` if the set contains `capability`.
    pub fn contains(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Returns `true` if the set contains all of `capabilities`.
    pub fn contains_all(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| self.capabilities.contains(c))
    }

    /// Returns the number of capabilities.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Returns `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Returns the capabilities in a stable order.
    pub fn sorted(&self) -> Vec<Capability> {
        let mut caps: Vec<_> = self.capabilities.iter().copied().collect();
        caps.sort();
        caps
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self::from_capabilities(iter)
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.sorted().iter().map(|c| c.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_parse() {
        assert_eq!(Capability::parse("Leads"), Some(Capability::Leads));
        assert_eq!(Capability::parse("PROJECTS"), Some(Capability::Projects));
        assert_eq!(Capability::parse("reports"), None);
    }

    #[test]
    fn test_capability_set() {
        let mut set = CapabilitySet::new();
        set.add(Capability::Dashboard);
        set.add(Capability::Leads);
        set.add(Capability::Leads);

        assert_eq!(set.len(), 2);
        assert!(set.contains(Capability::Leads));
        assert!(!set.contains(Capability::Users));
        assert!(set.contains_all(&[Capability::Dashboard, Capability::Leads]));
        assert_eq!(set.to_string(), "[dashboard, leads]");
    }
}
