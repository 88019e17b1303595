// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema for the Rocket CRM gate.
//!
//! ```text
//! GateConfig
//! ├── api: ApiConfig
//! ├── session: SessionConfig
//! ├── demo: DemoConfig
//! └── logging: LoggingConfig
//! ```
//!
//! Every section has defaults, so an empty document is a valid
//! configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use rocket_core::LegacySessionPolicy;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Default API request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default session lifetime in days.
pub const DEFAULT_LIFETIME_DAYS: u32 = 25;

/// Default watchdog interval in seconds.
pub const DEFAULT_WATCHDOG_INTERVAL_SECS: u64 = 60;

/// Longest accepted watchdog re-check interval (one day).
pub const MAX_WATCHDOG_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Default demo account email.
pub const DEFAULT_DEMO_EMAIL: &str = "demo@rocketcrm.com";

/// Default demo account password.
pub const DEFAULT_DEMO_PASSWORD: &str = "demo123";

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// External API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Session persistence and expiry.
    #[serde(default)]
    pub session: SessionConfig,

    /// Demo account.
    #[serde(default)]
    pub demo: DemoConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GateConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.api.validate()?;
        self.session.validate()?;
        self.demo.validate()?;
        Ok(())
    }
}

// =============================================================================
// API Configuration
// =============================================================================

/// External CRM API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL every request path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ApiConfig {
    /// Validates the API configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::validation("api.base_url", "cannot be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "api.base_url",
                "must start with http:// or https://",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "api.request_timeout_secs",
                "cannot be zero",
            ));
        }
        Ok(())
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Session persistence, expiry and watchdog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Directory holding one file per storage key.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Storage key for the user object.
    #[serde(default = "default_user_key")]
    pub user_key: String,

    /// Storage key for the bearer token.
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Lifetime granted at login, in days.
    #[serde(default = "default_lifetime_days")]
    pub lifetime_days: u32,

    /// Watchdog re-check interval in seconds.
    #[serde(default = "default_watchdog_interval")]
    pub watchdog_interval_secs: u64,

    /// Treatment of stored sessions without an expiry.
    #[serde(default)]
    pub legacy_sessions: LegacySessionPolicy,
}

/// Returns the default session storage directory.
pub fn default_storage_dir() -> PathBuf {
    PathBuf::from("./data/session")
}

fn default_user_key() -> String {
    "user".to_string()
}

fn default_token_key() -> String {
    "token".to_string()
}

fn default_lifetime_days() -> u32 {
    DEFAULT_LIFETIME_DAYS
}

fn default_watchdog_interval() -> u64 {
    DEFAULT_WATCHDOG_INTERVAL_SECS
}

impl SessionConfig {
    /// Validates the session configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, key) in [
            ("session.user_key", &self.user_key),
            ("session.token_key", &self.token_key),
        ] {
            if key.is_empty() {
                return Err(ConfigError::validation(field, "cannot be empty"));
            }
            if key.starts_with('.') || key.contains(['/', '\\']) {
                return Err(ConfigError::validation(
                    field,
                    "must not start with '.' or contain path separators",
                ));
            }
        }
        if self.user_key == self.token_key {
            return Err(ConfigError::validation(
                "session.token_key",
                "must differ from session.user_key",
            ));
        }
        if self.lifetime_days == 0 {
            return Err(ConfigError::validation(
                "session.lifetime_days",
                "cannot be zero",
            ));
        }
        if self.watchdog_interval_secs == 0 {
            return Err(ConfigError::validation(
                "session.watchdog_interval_secs",
                "cannot be zero",
            ));
        }
        if self.watchdog_interval_secs > MAX_WATCHDOG_INTERVAL_SECS {
            return Err(ConfigError::validation(
                "session.watchdog_interval_secs",
                format!("cannot exceed {} seconds", MAX_WATCHDOG_INTERVAL_SECS),
            ));
        }
        Ok(())
    }

    /// Returns the session lifetime as a Duration.
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(u64::from(self.lifetime_days) * 24 * 60 * 60)
    }

    /// Returns the watchdog interval as a Duration.
    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_secs(self.watchdog_interval_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            user_key: default_user_key(),
            token_key: default_token_key(),
            lifetime_days: DEFAULT_LIFETIME_DAYS,
            watchdog_interval_secs: DEFAULT_WATCHDOG_INTERVAL_SECS,
            legacy_sessions: LegacySessionPolicy::default(),
        }
    }
}

// =============================================================================
// Demo Configuration
// =============================================================================

/// Demo account that logs in without the API.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoConfig {
    /// Whether the demo account is accepted.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Demo email.
    #[serde(default = "default_demo_email")]
    pub email: String,

    /// Demo password.
    #[serde(default = "default_demo_password")]
    pub password: String,
}

fn default_enabled() -> bool {
    true
}

fn default_demo_email() -> String {
    DEFAULT_DEMO_EMAIL.to_string()
}

fn default_demo_password() -> String {
    DEFAULT_DEMO_PASSWORD.to_string()
}

impl DemoConfig {
    /// Validates the demo configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.email.trim().is_empty() {
            return Err(ConfigError::validation("demo.email", "cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::validation("demo.password", "cannot be empty"));
        }
        Ok(())
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            email: default_demo_email(),
            password: default_demo_password(),
        }
    }
}

impl std::fmt::Debug for DemoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoConfig")
            .field("enabled", &self.enabled)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Single-line compact text.
    Compact,
    /// JSON lines.
    Json,
}

impl LogFormat {
    /// Returns the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }

    /// Parses a format name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
