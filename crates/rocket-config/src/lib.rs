// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # rocket-config
//!
//! Configuration management for the Rocket CRM gate.
//!
//! ## Features
//!
//! - **Schema**: API, session, demo account and logging sections, all with
//!   defaults and validation
//! - **Multi-Format Support**: YAML, TOML and JSON files
//! - **Environment Overrides**: `${VAR:default}` placeholders and
//!   `ROCKET_*` variables
//!
//! ## Quick Start
//!
//! ```
//! use rocket_config::{ConfigFormat, ConfigLoader};
//!
//! let yaml = "api:\n  base_url: https://crm.example.com/api\n";
//! let config = ConfigLoader::new()
//!     .with_env_vars(false)
//!     .load_from_str(yaml, ConfigFormat::Yaml)
//!     .unwrap();
//!
//! assert_eq!(config.session.lifetime_days, 25);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{
    ApiConfig, DemoConfig, GateConfig, LogFormat, LogLevel, LoggingConfig, SessionConfig,
    MAX_WATCHDOG_INTERVAL_SECS,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
