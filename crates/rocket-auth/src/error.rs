// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and API error types.

use thiserror::Error;

use rocket_core::StoreError;

/// Result type alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Message shown when the API rejects a login without saying why.
pub const DEFAULT_REJECTED_MESSAGE: &str = "Email or Password Error";

/// Message shown when the API cannot be reached.
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error";

// =============================================================================
// AuthError
// =============================================================================

/// Errors raised by the login flow and the API client.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The API rejected the credentials.
    #[error("Login rejected: {message}")]
    Rejected {
        /// Message from the API, or the default rejection message.
        message: String,
    },

    /// The API could not be reached.
    #[error("Network error: {message}")]
    Network {
        /// Transport error description.
        message: String,
    },

    /// The login response carried no access token.
    #[error("Login response did not include an access token")]
    MissingToken,

    /// The API answered 401 on an authenticated request.
    #[error("Unauthorized")]
    Unauthorized,

    /// The API answered with an unexpected status or body.
    #[error("Invalid response from {path}: {message}")]
    InvalidResponse {
        /// Request path.
        path: String,
        /// What was wrong.
        message: String,
    },

    /// The API offers no endpoint for this write.
    #[error("Cannot {operation} {collection}: not supported by the API")]
    Unsupported {
        /// Collection name.
        collection: String,
        /// Attempted operation.
        operation: String,
    },

    /// The session could not be persisted.
    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Creates a rejection, falling back to the default message.
    pub fn rejected(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTED_MESSAGE.to_string());
        Self::Rejected { message }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an invalid response error.
    pub fn invalid_response(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported write error.
    pub fn unsupported(collection: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Unsupported {
            collection: collection.into(),
            operation: operation.into(),
        }
    }

    /// Returns the message suitable for showing on the login form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } => message.clone(),
            Self::Network { .. } => NETWORK_ERROR_MESSAGE.to_string(),
            Self::MissingToken | Self::Unauthorized | Self::InvalidResponse { .. } => {
                DEFAULT_REJECTED_MESSAGE.to_string()
            }
            Self::Unsupported { .. } => self.to_string(),
            Self::Store(e) => e.to_string(),
        }
    }

    /// Returns `true` for [`AuthError::Unauthorized`].
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns the error type name for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "rejected",
            Self::Network { .. } => "network",
            Self::MissingToken => "missing_token",
            Self::Unauthorized => "unauthorized",
            Self::InvalidResponse { .. } => "invalid_response",
            Self::Unsupported { .. } => "unsupported",
            Self::Store(_) => "store",
        }
    }
}
