// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! External CRM API client.
//!
//! [`ApiClient`] is the seam between the gate and the REST API. The HTTP
//! implementation attaches `Authorization: Bearer <token>` to every
//! authenticated request and maps HTTP 401 to [`AuthError::Unauthorized`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rocket_core::UserProfile;

use crate::error::{AuthError, AuthResult};

/// Login endpoint path.
pub const LOGIN_PATH: &str = "/auth/login";

/// Rejection message when the error body is not JSON.
pub const UNREADABLE_ERROR_MESSAGE: &str = "Login failed";

// =============================================================================
// Wire types
// =============================================================================

/// Login credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Tokens returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginTokens {
    /// Bearer token for subsequent requests.
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Body of a successful login response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The authenticated user.
    pub user: UserProfile,
    /// Issued tokens.
    #[serde(default)]
    pub tokens: Option<LoginTokens>,
}

impl LoginResponse {
    /// Returns the non-empty access token, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.tokens
            .as_ref()
            .and_then(|t| t.access_token.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// HTTP method of an authenticated write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WriteMethod {
    /// Create.
    Post,
    /// Partial update.
    Patch,
    /// Delete.
    Delete,
}

impl WriteMethod {
    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMethod::Post => "POST",
            WriteMethod::Patch => "PATCH",
            WriteMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for WriteMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

// =============================================================================
// ApiClient Trait
// =============================================================================

/// Access to the external CRM API.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Exchanges credentials for a user and access token.
    async fn login(&self, credentials: &Credentials) -> AuthResult<LoginResponse>;

    /// Performs an authenticated GET and returns the JSON body.
    async fn get_json(&self, path: &str, token: &str) -> AuthResult<serde_json::Value>;

    /// Performs an authenticated write and returns the JSON body.
    ///
    /// An empty response body yields `Value::Null`.
    async fn send_json(
        &self,
        method: WriteMethod,
        path: &str,
        token: &str,
        body: Option<&serde_json::Value>,
    ) -> AuthResult<serde_json::Value>;

    /// Returns the name of this client for logging.
    fn name(&self) -> &str;
}

// =============================================================================
// HTTP Client
// =============================================================================

/// [`ApiClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client for `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AuthResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AuthError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client with the default timeout.
    pub fn with_default_timeout(base_url: impl Into<String>) -> AuthResult<Self> {
        Self::new(base_url, Self::DEFAULT_TIMEOUT)
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn login(&self, credentials: &Credentials) -> AuthResult<LoginResponse> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => Some(UNREADABLE_ERROR_MESSAGE.to_string()),
            };
            debug!(status = %status, "Login rejected by API");
            return Err(AuthError::rejected(message));
        }

        response
            .json::<LoginResponse>()
            .await
            .map_err(|e| AuthError::invalid_response(LOGIN_PATH, e.to_string()))
    }

    async fn get_json(&self, path: &str, token: &str) -> AuthResult<serde_json::Value> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(path = path, "API rejected the session token");
            return Err(AuthError::Unauthorized);
        }
        if !status.is_success() {
            return Err(AuthError::invalid_response(path, format!("status {}", status)));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AuthError::invalid_response(path, e.to_string()))
    }

    async fn send_json(
        &self,
        method: WriteMethod,
        path: &str,
        token: &str,
        body: Option<&serde_json::Value>,
    ) -> AuthResult<serde_json::Value> {
        let url = self.url(path);
        let mut request = match method {
            WriteMethod::Post => self.client.post(url),
            WriteMethod::Patch => self.client.patch(url),
            WriteMethod::Delete => self.client.delete(url),
        }
        .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(method = %method, path = path, "API rejected the session token");
            return Err(AuthError::Unauthorized);
        }
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(ErrorBody {
                    message: Some(message),
                }) => message,
                _ => format!("status {}", status),
            };
            return Err(AuthError::invalid_response(path, message));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AuthError::invalid_response(path, e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| AuthError::invalid_response(path, e.to_string()))
    }

    fn name(&self) -> &str {
        "http"
    }
}

// =============================================================================
// Tests
// =============================================================================
