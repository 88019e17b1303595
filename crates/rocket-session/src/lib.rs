// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # rocket-session
//!
//! Session lifecycle for the Rocket CRM gate.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SessionContext                          │
//! │         (logged-in flag + current user, watch channel)       │
//! │                                                              │
//! │  ┌──────────────────┐        ┌───────────────────────────┐   │
//! │  │ SessionValidator │───────▶│       SessionStore        │   │
//! │  │ (expiry, policy) │        │ ("user" JSON + "token")   │   │
//! │  └──────────────────┘        └─────────────┬─────────────┘   │
//! │                                            │                 │
//! │                                 ┌──────────▼──────────┐      │
//! │                                 │  Storage backend    │      │
//! │                                 │  (Memory / File)    │      │
//! │                                 └─────────────────────┘      │
//! └───────────────────────────▲─────────────────────────────────┘
//!                             │ revalidate() every tick
//!                    ┌────────┴────────┐
//!                    │ SessionWatchdog │
//!                    └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rocket_core::{LegacySessionPolicy, SystemClock};
//! use rocket_session::{
//!     MemoryStorage, SessionContext, SessionStore, SessionValidator, SessionWatchdog,
//!     WatchdogConfig,
//! };
//!
//! let store = SessionStore::new(Arc::new(MemoryStorage::new()));
//! let validator = SessionValidator::new(SystemClock::shared(), LegacySessionPolicy::Accept);
//! let context = Arc::new(SessionContext::new(store, validator));
//!
//! let watchdog = SessionWatchdog::new(context.clone(), WatchdogConfig::default());
//! watchdog.start();
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod context;
pub mod storage;
pub mod store;
pub mod validity;
pub mod watchdog;

// =============================================================================
// Re-exports
// =============================================================================

pub use context::{LogoutReason, Revalidation, SessionContext, SessionSnapshot};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{SessionStore, StorageKeys, StoredUser};
pub use validity::{SessionStatus, SessionValidator};
pub use watchdog::{SessionWatchdog, WatchdogConfig, WatchdogMetricsSnapshot, WatchdogState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
