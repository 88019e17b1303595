// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! - [`MockApiClient`]: scriptable [`ApiClient`] that records every call
//! - [`FailingStorage`]: in-memory [`Storage`] whose writes can be made to fail

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use rocket_auth::{
    ApiClient, AuthError, AuthResult, Credentials, LoginResponse, LoginTokens, WriteMethod,
};
use rocket_core::{StoreError, StoreResult, UserProfile};
use rocket_session::{MemoryStorage, Storage};

use super::fixtures::API_PASSWORD;

// =============================================================================
// Mock API Client
// =============================================================================

/// Scripted reply for a collection path.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Reply with a JSON body.
    Body(Value),
    /// Reply with HTTP 401.
    Unauthorized,
    /// Reply with any other failure.
    Fail(String),
}

/// Scripted login failure.
#[derive(Debug, Clone)]
pub enum LoginFailure {
    /// The API could not be reached.
    Network,
    /// The API rejected the credentials with an optional message.
    Rejected(Option<String>),
}

/// An [`ApiClient`] backed by in-memory accounts and scripted responses.
///
/// Unscripted collection paths reply with an empty array and unscripted
/// writes reply with `null`.
#[derive(Debug, Default)]
pub struct MockApiClient {
    accounts: RwLock<HashMap<String, (String, UserProfile)>>,
    login_failure: RwLock<Option<LoginFailure>>,
    omit_token: AtomicBool,
    responses: RwLock<HashMap<String, MockResponse>>,
    login_calls: AtomicU64,
    requests: Mutex<Vec<(String, String)>>,
    writes: Mutex<Vec<RecordedWrite>>,
}

/// A write received by [`MockApiClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedWrite {
    /// HTTP method.
    pub method: WriteMethod,
    /// Request path.
    pub path: String,
    /// Bearer token.
    pub token: String,
    /// JSON body.
    pub body: Option<Value>,
}

impl MockApiClient {
    /// Creates a mock with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `user`, accepted with [`API_PASSWORD`].
    pub fn with_user(self, user: UserProfile) -> Self {
        self.add_user(user);
        self
    }

    /// Adds `user`, accepted with [`API_PASSWORD`].
    pub fn add_user(&self, user: UserProfile) {
        let email = user.email.clone().unwrap_or_else(|| user.id.clone());
        self.accounts
            .write()
            .insert(email, (API_PASSWORD.to_string(), user));
    }

    /// Makes every login fail with `failure`.
    pub fn fail_login(&self, failure: LoginFailure) {
        *self.login_failure.write() = Some(failure);
    }

    /// Makes successful logins omit the access token.
    pub fn omit_token(&self, omit: bool) {
        self.omit_token.store(omit, Ordering::SeqCst);
    }

    /// Scripts the reply for `path`.
    pub fn respond(&self, path: &str, response: MockResponse) {
        self.responses.write().insert(path.to_string(), response);
    }

    /// Scripts `path` to reply with `body`.
    pub fn with_response(self, path: &str, body: Value) -> Self {
        self.respond(path, MockResponse::Body(body));
        self
    }

    /// Number of login calls received.
    pub fn login_calls(&self) -> u64 {
        self.login_calls.load(Ordering::SeqCst)
    }

    /// `(path, token)` of every authenticated request, in order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().clone()
    }

    /// Every write received, in order.
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().clone()
    }

    /// Token issued for `user`.
    pub fn token_for(user: &UserProfile) -> String {
        format!("token-{}", user.id)
    }
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn login(&self, credentials: &Credentials) -> AuthResult<LoginResponse> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);

        match self.login_failure.read().clone() {
            Some(LoginFailure::Network) => return Err(AuthError::network("connection refused")),
            Some(LoginFailure::Rejected(message)) => return Err(AuthError::rejected(message)),
            None => {}
        }

        let user = match self.accounts.read().get(&credentials.email) {
            Some((password, user)) if *password == credentials.password => user.clone(),
            _ => return Err(AuthError::rejected(Some("Invalid credentials".to_string()))),
        };

        let access_token = if self.omit_token.load(Ordering::SeqCst) {
            None
        } else {
            Some(Self::token_for(&user))
        };

        Ok(LoginResponse {
            user,
            tokens: Some(LoginTokens { access_token }),
        })
    }

    async fn get_json(&self, path: &str, token: &str) -> AuthResult<Value> {
        self.requests
            .lock()
            .push((path.to_string(), token.to_string()));

        match self.responses.read().get(path).cloned() {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Unauthorized) => Err(AuthError::Unauthorized),
            Some(MockResponse::Fail(message)) => Err(AuthError::invalid_response(path, message)),
            None => Ok(Value::Array(Vec::new())),
        }
    }

    async fn send_json(
        &self,
        method: WriteMethod,
        path: &str,
        token: &str,
        body: Option<&Value>,
    ) -> AuthResult<Value> {
        self.writes.lock().push(RecordedWrite {
            method,
            path: path.to_string(),
            token: token.to_string(),
            body: body.cloned(),
        });

        match self.responses.read().get(path).cloned() {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Unauthorized) => Err(AuthError::Unauthorized),
            Some(MockResponse::Fail(message)) => Err(AuthError::invalid_response(path, message)),
            None => Ok(Value::Null),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// =============================================================================
// Failing Storage
// =============================================================================

/// In-memory storage whose writes fail on demand.
#[derive(Debug, Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    fail_writes: AtomicBool,
}

impl FailingStorage {
    /// Creates a storage that accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `set` calls fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Storage for FailingStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::io(
                PathBuf::from(key),
                io::Error::new(io::ErrorKind::Other, "simulated write failure"),
            ));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key)
    }

    fn name(&self) -> &str {
        "failing"
    }
}
