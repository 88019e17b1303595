// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Storage error types.
//!
//! Reads never surface errors to callers (an unreadable session is simply
//! absent), so these errors only come out of writes and removals.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a session storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The record could not be encoded.
    #[error("Failed to serialize '{key}': {message}")]
    Serialization {
        /// Storage key being written.
        key: String,
        /// Error message.
        message: String,
    },

    /// The key is not usable by this backend.
    #[error("Invalid storage key '{key}': {message}")]
    InvalidKey {
        /// Offending key.
        key: String,
        /// Error message.
        message: String,
    },
}

impl StoreError {
    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a serialization error.
    pub fn serialization(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid key error.
    pub fn invalid_key(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "io",
            StoreError::Serialization { .. } => "serialization",
            StoreError::InvalidKey { .. } => "invalid_key",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::serialization("user", "bad json");
        assert_eq!(err.to_string(), "Failed to serialize 'user': bad json");
        assert_eq!(err.error_type(), "serialization");

        let err = StoreError::invalid_key("../x", "path separators are not allowed");
        assert_eq!(err.error_type(), "invalid_key");
    }
}
