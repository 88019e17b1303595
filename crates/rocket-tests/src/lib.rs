// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Rocket Gate Integration Tests
//!
//! Integration tests and shared test utilities for the Rocket CRM session
//! gate.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Users, credentials and API payloads
//!   - `builders`: Session records and raw storage seeding
//!   - `assertions`: Session and capability assertions
//!   - `mocks`: Scriptable API client and failing storage
//!   - `harness`: Wires a clock, storage and API into gate components
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rocket-tests
//! cargo test -p rocket-tests --test integration_session
//! cargo test -p rocket-tests --test integration_access
//! cargo test -p rocket-tests --test integration_login
//! cargo test -p rocket-tests --test integration_config
//! ```
//!
//! ## Using the Harness
//!
//! ```rust,ignore
//! use rocket_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let harness = GateHarness::new();
//!     let shell = harness.shell();
//!     shell.login(&CredentialFixtures::demo()).await.unwrap();
//!     harness.advance(Duration::from_secs(26 * 86_400));
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
    pub use crate::common::{init_test_logging, temp_test_dir};
}
