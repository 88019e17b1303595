// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Login flow.
//!
//! A login produces a complete [`SessionRecord`] and hands it to the
//! [`SessionContext`] in one step. Any failure leaves the existing session
//! state untouched.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use rocket_core::{SessionRecord, SharedClock, UserProfile, DEFAULT_SESSION_LIFETIME};
use rocket_session::SessionContext;

use crate::client::{ApiClient, Credentials};
use crate::error::{AuthError, AuthResult};

// =============================================================================
// DemoAccount
// =============================================================================

/// Built-in account that logs in without contacting the API.
#[derive(Clone, PartialEq, Eq)]
pub struct DemoAccount {
    /// Email to match.
    pub email: String,
    /// Password to match.
    pub password: String,
    /// Token stored for the demo session.
    pub token: String,
}

impl DemoAccount {
    /// Default demo email.
    pub const DEFAULT_EMAIL: &'static str = "demo@rocketcrm.com";
    /// Default demo password.
    pub const DEFAULT_PASSWORD: &'static str = "demo123";
    /// Token stored for demo sessions.
    pub const DEFAULT_TOKEN: &'static str = "demo-access-token";

    /// Creates a demo account with custom credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            token: Self::DEFAULT_TOKEN.to_string(),
        }
    }

    /// Returns `true` if `credentials` match exactly.
    pub fn matches(&self, credentials: &Credentials) -> bool {
        credentials.email == self.email && credentials.password == self.password
    }

    /// Returns the profile of the demo user.
    pub fn user(&self) -> UserProfile {
        UserProfile::new("demo-user-01")
            .with_name("Demo Admin")
            .with_email(self.email.clone())
            .with_role("admin")
    }
}

impl Default for DemoAccount {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EMAIL, Self::DEFAULT_PASSWORD)
    }
}

impl std::fmt::Debug for DemoAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoAccount")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// LoginOutcome
// =============================================================================

/// How a login was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKind {
    /// Matched the demo account.
    Demo,
    /// Authenticated by the API.
    Api,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    /// How the login was satisfied.
    pub kind: LoginKind,
    /// The signed-in user.
    pub user: UserProfile,
    /// Session expiry, ms since the Unix epoch.
    pub expires_at: i64,
}

// =============================================================================
// LoginService
// =============================================================================

/// Authenticates credentials and establishes sessions.
pub struct LoginService {
    api: Arc<dyn ApiClient>,
    clock: SharedClock,
    lifetime: Duration,
    demo: Option<DemoAccount>,
}

impl LoginService {
    /// Creates a service with the default lifetime and demo account.
    pub fn new(api: Arc<dyn ApiClient>, clock: SharedClock) -> Self {
        Self {
            api,
            clock,
            lifetime: DEFAULT_SESSION_LIFETIME,
            demo: Some(DemoAccount::default()),
        }
    }

    /// Sets the session lifetime.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Sets or disables the demo account.
    pub fn with_demo(mut self, demo: Option<DemoAccount>) -> Self {
        self.demo = demo;
        self
    }

    /// Returns the session lifetime.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Returns the demo account, if enabled.
    pub fn demo(&self) -> Option<&DemoAccount> {
        self.demo.as_ref()
    }

    /// Returns the API client.
    pub fn api(&self) -> &Arc<dyn ApiClient> {
        &self.api
    }

    /// Authenticates `credentials` and establishes the session in `context`.
    pub async fn login(
        &self,
        context: &SessionContext,
        credentials: &Credentials,
    ) -> AuthResult<LoginOutcome> {
        let (kind, user, token) = match self.demo.as_ref().filter(|d| d.matches(credentials)) {
            Some(demo) => (LoginKind::Demo, demo.user(), demo.token.clone()),
            None => {
                let response = self.api.login(credentials).await.map_err(|e| {
                    warn!(
                        email = %credentials.email,
                        error_type = e.error_type(),
                        error = %e,
                        "Login failed"
                    );
                    e
                })?;
                let token = response
                    .access_token()
                    .map(str::to_string)
                    .ok_or(AuthError::MissingToken)?;
                (LoginKind::Api, response.user, token)
            }
        };

        let record = SessionRecord::issue(user, token, self.clock.now_millis(), self.lifetime);
        let expires_at = record.expires_at.unwrap_or_default();
        let user = record.user.clone();
        context.establish(record)?;

        info!(
            user_id = %user.id,
            kind = ?kind,
            client = self.api.name(),
            "Login succeeded"
        );

        Ok(LoginOutcome {
            kind,
            user,
            expires_at,
        })
    }
}

impl std::fmt::Debug for LoginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginService")
            .field("api", &self.api.name())
            .field("lifetime", &self.lifetime)
            .field("demo", &self.demo)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;
    use rocket_core::{Clock, LegacySessionPolicy, ManualClock};
    use rocket_session::{MemoryStorage, SessionStore, SessionValidator};

    use crate::client::{LoginResponse, LoginTokens};

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    #[derive(Default)]
    struct StubApi {
        calls: AtomicU64,
        token: Option<String>,
        reject: bool,
    }

    #[async_trait]
    impl ApiClient for StubApi {
        async fn login(&self, _credentials: &Credentials) -> AuthResult<LoginResponse> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.reject {
                return Err(AuthError::rejected(None));
            }
            Ok(LoginResponse {
                user: UserProfile::new("42").with_role("sales_rep"),
                tokens: Some(LoginTokens {
                    access_token: self.token.clone(),
                }),
            })
        }

        async fn get_json(&self, _path: &str, _token: &str) -> AuthResult<serde_json::Value> {
            Ok(serde_json::Value::Array(vec![]))
        }

        async fn send_json(
            &self,
            _method: crate::client::WriteMethod,
            _path: &str,
            _token: &str,
            _body: Option<&serde_json::Value>,
        ) -> AuthResult<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn setup(api: StubApi) -> (Arc<StubApi>, Arc<ManualClock>, SessionContext, LoginService) {
        let api = Arc::new(api);
        let clock = Arc::new(ManualClock::new(1_000_000));
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let ctx = SessionContext::new(
            store,
            SessionValidator::new(clock.clone(), LegacySessionPolicy::Accept),
        );
        let service = LoginService::new(api.clone(), clock.clone());
        (api, clock, ctx, service)
    }

    #[tokio::test]
    async fn test_demo_login_skips_api() {
        let (api, clock, ctx, service) = setup(StubApi::default());

        let outcome = service
            .login(&ctx, &Credentials::new("demo@rocketcrm.com", "demo123"))
            .await
            .unwrap();

        assert_eq!(outcome.kind, LoginKind::Demo);
        assert_eq!(outcome.expires_at, clock.now_millis() + 25 * DAY_MS);
        assert_eq!(api.calls.load(Ordering::Relaxed), 0);

        let record = ctx.store().load().unwrap();
        assert_eq!(record.issued_token, "demo-access-token");
        assert_eq!(record.user.id, "demo-user-01");
        assert_eq!(record.user.name.as_deref(), Some("Demo Admin"));
        assert_eq!(record.role(), Some("admin"));
        assert!(ctx.is_logged_in());
    }

    #[tokio::test]
    async fn test_huge_lifetime_does_not_expire_immediately() {
        let (_, _, ctx, service) = setup(StubApi::default());
        let service = service.with_lifetime(Duration::MAX);

        let outcome = service
            .login(&ctx, &Credentials::new("demo@rocketcrm.com", "demo123"))
            .await
            .unwrap();

        assert_eq!(outcome.expires_at, i64::MAX);
        assert!(ctx.is_valid());
    }

    #[tokio::test]
    async fn test_api_login_establishes_session() {
        let (api, _, ctx, service) = setup(StubApi {
            token: Some("T9".into()),
            ..Default::default()
        });

        let outcome = service
            .login(&ctx, &Credentials::new("rep@rocketcrm.com", "pw"))
            .await
            .unwrap();

        assert_eq!(outcome.kind, LoginKind::Api);
        assert_eq!(api.calls.load(Ordering::Relaxed), 1);
        assert_eq!(ctx.token().as_deref(), Some("T9"));
        assert_eq!(ctx.role().as_deref(), Some("sales_rep"));
    }

    #[tokio::test]
    async fn test_missing_token_leaves_state_untouched() {
        let (_, _, ctx, service) = setup(StubApi::default());

        let err = service
            .login(&ctx, &Credentials::new("rep@rocketcrm.com", "pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::MissingToken));
        assert!(!ctx.is_logged_in());
        assert!(ctx.store().load().is_none());
    }

    #[tokio::test]
    async fn test_rejected_login_keeps_existing_session() {
        let (_, _, ctx, service) = setup(StubApi {
            reject: true,
            ..Default::default()
        });
        service
            .login(&ctx, &Credentials::new("demo@rocketcrm.com", "demo123"))
            .await
            .unwrap();

        let err = service
            .login(&ctx, &Credentials::new("other@rocketcrm.com", "bad"))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Email or Password Error");
        assert_eq!(ctx.current_user().unwrap().id, "demo-user-01");
    }

    #[tokio::test]
    async fn test_disabled_demo_goes_to_api() {
        let (api, _, ctx, service) = setup(StubApi {
            token: Some("T1".into()),
            ..Default::default()
        });
        let service = service.with_demo(None);

        let outcome = service
            .login(&ctx, &Credentials::new("demo@rocketcrm.com", "demo123"))
            .await
            .unwrap();

        assert_eq!(outcome.kind, LoginKind::Api);
        assert_eq!(api.calls.load(Ordering::Relaxed), 1);
    }
}
