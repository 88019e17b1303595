// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # rocket-core
//!
//! Core abstractions and shared types for the Rocket CRM session gate.
//!
//! This crate provides the foundational types used across all gate
//! components:
//!
//! - **Types**: `UserProfile`, `SessionRecord`, `LegacySessionPolicy`
//! - **Clock**: Injectable wall-clock source (`SystemClock`, `ManualClock`)
//! - **Error**: Storage error hierarchy shared by every store backend
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use rocket_core::{Clock, ManualClock, SessionRecord, UserProfile};
//!
//! let clock = ManualClock::new(1_000);
//! let user = UserProfile::new("u-1").with_role("admin");
//! let record = SessionRecord::issue(user, "token", clock.now_millis(), Duration::from_secs(60));
//!
//! assert!(!record.is_expired_at(clock.now_millis()));
//! clock.advance(Duration::from_secs(61));
//! assert!(record.is_expired_at(clock.now_millis()));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod clock;
pub mod error;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::{StoreError, StoreResult};
pub use types::{LegacySessionPolicy, SessionRecord, UserProfile, DEFAULT_SESSION_LIFETIME};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
