// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # rocket-bin
//!
//! Command-line shell for the Rocket CRM session gate.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         main.rs                              │
//! │            (CLI parsing, config, logging setup)              │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                    ┌──────▼──────┐
//!                    │  commands   │
//!                    └──────┬──────┘
//!                           │
//!                    ┌──────▼──────┐        ┌──────────────┐
//!                    │    Shell    │◀───────│   shutdown   │
//!                    └──────┬──────┘        └──────────────┘
//!                           │
//!        ┌──────────┬───────┴──────┬──────────────┐
//!        ▼          ▼              ▼              ▼
//!   SessionContext RouteGuard SessionWatchdog LoginService / ResourceClient
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Sign in with the demo account
//! rocket login -e demo@rocketcrm.com -p demo123
//!
//! # Show the session (default command)
//! rocket
//!
//! # Open a view through the route guard
//! rocket open leads
//!
//! # Keep the watchdog running until the session expires
//! rocket watch
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod shell;
pub mod shutdown;

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use shell::{Shell, ShellBuilder, ShellStatus, WatchExit};
pub use shutdown::ShutdownCoordinator;
