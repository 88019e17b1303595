// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! [`GateHarness`] owns a manual clock, in-memory storage and a mock API,
//! and builds gate components over them. Components built from the same
//! harness share storage, so building a second context behaves like
//! reopening the application.

use std::sync::Arc;
use std::time::Duration;

use rocket_auth::{LoginService, ResourceClient};
use rocket_bin::Shell;
use rocket_config::GateConfig;
use rocket_core::{LegacySessionPolicy, ManualClock, SharedClock};
use rocket_session::{
    MemoryStorage, SessionContext, SessionStore, SessionValidator, SessionWatchdog, Storage,
    WatchdogConfig,
};

use super::fixtures::START_MS;
use super::mocks::MockApiClient;

/// Shared clock, storage and API for one test.
#[derive(Debug, Clone)]
pub struct GateHarness {
    /// Clock starting at [`START_MS`].
    pub clock: Arc<ManualClock>,
    /// Session storage.
    pub storage: Arc<MemoryStorage>,
    /// External API.
    pub api: Arc<MockApiClient>,
    /// Treatment of sessions without an expiry.
    pub policy: LegacySessionPolicy,
}

impl Default for GateHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl GateHarness {
    /// Creates a harness with an empty mock API.
    pub fn new() -> Self {
        Self::with_api(MockApiClient::new())
    }

    /// Creates a harness around `api`.
    pub fn with_api(api: MockApiClient) -> Self {
        Self {
            clock: Arc::new(ManualClock::new(START_MS)),
            storage: Arc::new(MemoryStorage::new()),
            api: Arc::new(api),
            policy: LegacySessionPolicy::Accept,
        }
    }

    /// Sets the legacy session policy.
    pub fn with_policy(mut self, policy: LegacySessionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Advances the clock.
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// The clock as a [`SharedClock`].
    pub fn shared_clock(&self) -> SharedClock {
        self.clock.clone()
    }

    /// A session store over the harness storage.
    pub fn store(&self) -> SessionStore {
        SessionStore::new(self.storage.clone() as Arc<dyn Storage>)
    }

    /// A validator over the harness clock.
    pub fn validator(&self) -> SessionValidator {
        SessionValidator::new(self.shared_clock(), self.policy)
    }

    /// A fresh context, restoring whatever is stored.
    pub fn context(&self) -> Arc<SessionContext> {
        Arc::new(SessionContext::new(self.store(), self.validator()))
    }

    /// A watchdog over `context`.
    pub fn watchdog(&self, context: &Arc<SessionContext>, interval: Duration) -> SessionWatchdog {
        SessionWatchdog::new(context.clone(), WatchdogConfig::with_interval(interval))
    }

    /// A login service with the default lifetime and demo account.
    pub fn login_service(&self) -> LoginService {
        LoginService::new(self.api.clone(), self.shared_clock())
    }

    /// A resource client over `context`.
    pub fn resources(&self, context: &Arc<SessionContext>) -> ResourceClient {
        ResourceClient::new(self.api.clone(), context.clone())
    }

    /// A shell with the default configuration.
    pub fn shell(&self) -> Shell {
        self.shell_with(GateConfig::default())
    }

    /// A shell with `config`. The harness policy overrides the configured one.
    pub fn shell_with(&self, mut config: GateConfig) -> Shell {
        config.session.legacy_sessions = self.policy;
        Shell::builder()
            .config(config)
            .storage(self.storage.clone())
            .api(self.api.clone())
            .clock(self.shared_clock())
            .build()
            .expect("Failed to build shell")
    }
}
