// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the rocket binary.

use thiserror::Error;

use rocket_auth::{AuthError, View};

/// Result type alias for rocket-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the rocket binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Initialization error.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// Runtime error.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// The route guard redirected the navigation.
    #[error("Access to {requested} denied, redirected to {redirected}")]
    Redirected {
        /// The view that was asked for.
        requested: View,
        /// Where the guard sent the navigation.
        redirected: View,
    },

    /// Authentication or API error.
    #[error("{}", .0.user_message())]
    Auth(#[source] AuthError),

    /// Config loading error.
    #[error("Config error: {0}")]
    Config(#[from] rocket_config::ConfigError),

    /// Session storage error.
    #[error("Session storage error: {0}")]
    Store(#[from] rocket_core::StoreError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// The context description.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Creates a runtime error.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Creates an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Adds context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Config(_) => 1,
            Self::Initialization(_) => 2,
            Self::Runtime(_) => 3,
            Self::Io(_) | Self::Store(_) => 4,
            Self::Redirected { .. } => 5,
            Self::Auth(_) => 6,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }
}

impl From<AuthError> for BinError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(e) => Self::Store(e),
            other => Self::Auth(other),
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<anyhow::Error> for BinError {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(format!("{:#}", err))
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Reports an error with its cause chain.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error);

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {}", cause);
        source = cause.source();
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BinError::config("missing base url");
        assert_eq!(err.to_string(), "Configuration error: missing base url");
    }

    #[test]
    fn test_error_with_context() {
        let err = BinError::io("disk full").with_context("saving session");
        assert_eq!(err.to_string(), "saving session: I/O error: disk full");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_auth_error_shows_user_message() {
        let err = BinError::from(AuthError::network("connection refused"));
        assert_eq!(err.to_string(), "Network Error");
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_redirect_error() {
        let err = BinError::Redirected {
            requested: View::Users,
            redirected: View::Dashboard,
        };
        assert_eq!(
            err.to_string(),
            "Access to /users denied, redirected to /dashboard"
        );
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BinError::config("x").exit_code(), 1);
        assert_eq!(BinError::init("x").exit_code(), 2);
        assert_eq!(BinError::runtime("x").exit_code(), 3);
        assert_eq!(BinError::from(anyhow::anyhow!("x")).exit_code(), 3);
    }
}
