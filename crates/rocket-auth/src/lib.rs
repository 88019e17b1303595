// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # rocket-auth
//!
//! Authorization and authentication for the Rocket CRM gate.
//!
//! This crate provides:
//! - Capabilities and the fixed role → capability table
//! - The route guard that allows or redirects every navigation
//! - The login flow, including the demo account bypass
//! - The external API client with bearer tokens and 401 handling

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod capability;
pub mod client;
pub mod error;
pub mod guard;
pub mod login;
pub mod rbac;
pub mod resources;

pub use capability::{Capability, CapabilitySet};
pub use client::{
    ApiClient, Credentials, HttpApiClient, LoginResponse, LoginTokens, WriteMethod,
};
pub use error::{AuthError, AuthResult};
pub use guard::{GuardDecision, RouteGuard, View};
pub use login::{DemoAccount, LoginKind, LoginOutcome, LoginService};
pub use rbac::{capabilities_for, Role};
pub use resources::{
    Collection, DashboardSummary, Mutation, MutationOutcome, ResourceClient, WriteRequest,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
