// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application shell.
//!
//! The shell wires the session context, route guard, watchdog, login flow
//! and resource client together and tracks the view currently shown.
//! Every way a session can end (explicit logout, expiry, an unauthorized
//! API response) stops the watchdog and lands on the login view.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use rocket_auth::{
    ApiClient, AuthError, Collection, Credentials, DashboardSummary, DemoAccount, HttpApiClient,
    LoginOutcome, LoginService, Mutation, MutationOutcome, ResourceClient, RouteGuard, View,
};
use rocket_config::GateConfig;
use rocket_core::{SharedClock, SystemClock, UserProfile};
use rocket_session::{
    FileStorage, LogoutReason, Revalidation, SessionContext, SessionStore, SessionValidator,
    SessionWatchdog, StorageKeys, Storage, WatchdogConfig, WatchdogState,
};

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// ShellStatus
// =============================================================================

/// Serializable summary of the shell state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellStatus {
    /// Whether a valid session is active.
    pub logged_in: bool,
    /// The signed-in user.
    pub user: Option<UserProfile>,
    /// Session expiry, if the session has one.
    pub expires_at: Option<DateTime<Utc>>,
    /// Path of the view currently shown.
    pub current_view: String,
    /// Paths of the views the user may open.
    pub menu: Vec<String>,
    /// Whether the watchdog is armed.
    pub watchdog_armed: bool,
}

/// Why [`Shell::watch`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchExit {
    /// There was no session to watch.
    NotLoggedIn,
    /// The session ended while watching.
    LoggedOut,
    /// Shutdown was requested.
    Shutdown,
}

// =============================================================================
// Shell
// =============================================================================

/// Owns one session and everything that acts on it.
pub struct Shell {
    config: GateConfig,
    context: Arc<SessionContext>,
    guard: RouteGuard,
    watchdog: SessionWatchdog,
    login: LoginService,
    resources: ResourceClient,
    current_view: RwLock<View>,
}

impl Shell {
    /// Returns a builder.
    pub fn builder() -> ShellBuilder {
        ShellBuilder::new()
    }

    /// Builds a shell with file storage and the HTTP client from `config`.
    pub fn from_config(config: GateConfig) -> BinResult<Self> {
        ShellBuilder::new().config(config).build()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Returns the session context.
    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    /// Returns the watchdog.
    pub fn watchdog(&self) -> &SessionWatchdog {
        &self.watchdog
    }

    /// Returns the view currently shown.
    pub fn current_view(&self) -> View {
        *self.current_view.read()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Opens the root route. Arms the watchdog when a session was restored.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> View {
        if self.context.is_logged_in() {
            self.watchdog.start();
        }
        self.navigate(View::Login)
    }

    /// Logs in, arms the watchdog and shows the dashboard.
    ///
    /// The login view is guarded like any other, so a live session is
    /// redirected to the dashboard and never replaced.
    pub async fn login(&self, credentials: &Credentials) -> BinResult<LoginOutcome> {
        self.require(View::Login)?;
        let outcome = self.login.login(&self.context, credentials).await?;
        self.watchdog.start();
        *self.current_view.write() = View::Dashboard;
        Ok(outcome)
    }

    /// Logs out, stops the watchdog and shows the login view.
    ///
    /// Returns `true` if a session was active.
    pub fn logout(&self) -> BinResult<bool> {
        self.watchdog.stop();
        *self.current_view.write() = View::Login;
        Ok(self.context.logout(LogoutReason::UserRequested)?)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Navigates to `view` and returns the view actually shown.
    pub fn navigate(&self, view: View) -> View {
        if self.context.revalidate() == Revalidation::LoggedOut {
            self.session_lost();
        }

        let decision = self.guard.evaluate(&self.context, view);
        let target = decision.target(view);
        if !decision.is_allowed() {
            info!(requested = %view, redirected = %target, "Navigation redirected");
        }
        *self.current_view.write() = target;
        target
    }

    /// Navigates to `view` and lists its collection.
    ///
    /// Views without a collection yield an empty list. A redirect or an
    /// unauthorized response is returned as [`BinError::Redirected`].
    pub async fn open(&self, view: View) -> BinResult<Vec<Value>> {
        self.require(view)?;
        let Some(collection) = Collection::for_view(view) else {
            return Ok(Vec::new());
        };

        match self.resources.list(collection).await {
            Ok(items) => Ok(items),
            Err(e) => Err(self.after_api_error(view, e)),
        }
    }

    /// Writes to the collection behind `view`, then reloads it.
    ///
    /// The write is guarded by the view's capability.
    pub async fn mutate(&self, view: View, mutation: Mutation) -> BinResult<MutationOutcome> {
        self.require(view)?;
        let collection = Collection::for_view(view)
            .ok_or_else(|| BinError::runtime(format!("{} has no collection to modify", view)))?;

        match self.resources.apply(collection, mutation).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => Err(self.after_api_error(view, e)),
        }
    }

    /// Navigates to the dashboard and counts its collections.
    pub async fn dashboard(&self) -> BinResult<DashboardSummary> {
        self.require(View::Dashboard)?;
        match self.resources.summary().await {
            Ok(summary) => Ok(summary),
            Err(e) => Err(self.after_api_error(View::Dashboard, e)),
        }
    }

    /// Returns the views the current user may open.
    pub fn menu(&self) -> Vec<View> {
        self.guard.menu(&self.context)
    }

    /// Returns a summary of the shell state.
    pub fn status(&self) -> ShellStatus {
        let record = self.context.check().into_record();
        ShellStatus {
            logged_in: record.is_some() && self.context.is_logged_in(),
            expires_at: record.as_ref().and_then(|r| r.expires_at_datetime()),
            user: record.map(|r| r.user),
            current_view: self.current_view().path().to_string(),
            menu: self.menu().iter().map(|v| v.path().to_string()).collect(),
            watchdog_armed: self.watchdog.state() == WatchdogState::Armed,
        }
    }

    // =========================================================================
    // Watching
    // =========================================================================

    /// Keeps the watchdog running until the session ends or shutdown.
    pub async fn watch(&self, shutdown: &ShutdownCoordinator) -> WatchExit {
        if !self.context.is_logged_in() {
            return WatchExit::NotLoggedIn;
        }
        self.watchdog.start();

        let mut logged_in = self.context.subscribe();
        let exit = loop {
            if !*logged_in.borrow_and_update() {
                break WatchExit::LoggedOut;
            }
            tokio::select! {
                changed = logged_in.changed() => {
                    if changed.is_err() {
                        break WatchExit::LoggedOut;
                    }
                }
                _ = shutdown.wait_for_shutdown() => {
                    break WatchExit::Shutdown;
                }
            }
        };

        match exit {
            WatchExit::LoggedOut => self.session_lost(),
            _ => {
                self.watchdog.stop();
            }
        }
        exit
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn require(&self, view: View) -> BinResult<()> {
        let shown = self.navigate(view);
        if shown == view {
            Ok(())
        } else {
            Err(BinError::Redirected {
                requested: view,
                redirected: shown,
            })
        }
    }

    fn after_api_error(&self, view: View, error: AuthError) -> BinError {
        if error.is_unauthorized() {
            self.session_lost();
            BinError::Redirected {
                requested: view,
                redirected: View::Login,
            }
        } else {
            error.into()
        }
    }

    fn session_lost(&self) {
        if self.watchdog.stop() {
            debug!("Watchdog stopped after session loss");
        }
        *self.current_view.write() = View::Login;
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("current_view", &self.current_view())
            .field("logged_in", &self.context.is_logged_in())
            .field("watchdog", &self.watchdog.state())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// ShellBuilder
// =============================================================================

/// Builder for [`Shell`]. Unset parts are derived from the configuration.
#[derive(Default)]
pub struct ShellBuilder {
    config: Option<GateConfig>,
    storage: Option<Arc<dyn Storage>>,
    api: Option<Arc<dyn ApiClient>>,
    clock: Option<SharedClock>,
}

impl ShellBuilder {
    /// Creates a builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: GateConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the storage backend instead of a file store.
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Sets the API client instead of the HTTP client.
    pub fn api(mut self, api: Arc<dyn ApiClient>) -> Self {
        self.api = Some(api);
        self
    }

    /// Sets the clock instead of the system clock.
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the shell, restoring any valid stored session.
    pub fn build(self) -> BinResult<Shell> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let storage: Arc<dyn Storage> = match self.storage {
            Some(storage) => storage,
            None => Arc::new(FileStorage::open(&config.session.storage_dir)?),
        };
        let api: Arc<dyn ApiClient> = match self.api {
            Some(api) => api,
            None => Arc::new(
                HttpApiClient::new(&config.api.base_url, config.api.request_timeout())
                    .map_err(|e| BinError::init(e.to_string()))?,
            ),
        };
        let clock = self.clock.unwrap_or_else(SystemClock::shared);

        let keys = StorageKeys::new(&config.session.user_key, &config.session.token_key);
        let store = SessionStore::with_keys(storage, keys);
        let validator = SessionValidator::new(clock.clone(), config.session.legacy_sessions);
        let context = Arc::new(SessionContext::new(store, validator));

        let watchdog = SessionWatchdog::new(
            context.clone(),
            WatchdogConfig::with_interval(config.session.watchdog_interval()),
        );

        let demo = config
            .demo
            .enabled
            .then(|| DemoAccount::new(&config.demo.email, &config.demo.password));
        let login = LoginService::new(api.clone(), clock)
            .with_lifetime(config.session.lifetime())
            .with_demo(demo);

        let resources = ResourceClient::new(api, context.clone());

        debug!(
            storage = ?config.session.storage_dir,
            api = %config.api.base_url,
            "Shell built"
        );

        Ok(Shell {
            config,
            context,
            guard: RouteGuard::new(),
            watchdog,
            login,
            resources,
            current_view: RwLock::new(View::Login),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
