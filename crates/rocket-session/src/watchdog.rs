// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Background session watchdog.
//!
//! The watchdog catches expiry while the user is idle: on every tick it
//! asks the [`SessionContext`] to revalidate, which logs out at most once
//! per session.
//!
//! # Lifecycle
//!
//! ```text
//!              start()
//!   ┌─────────┐ ─────────▶ ┌────────┐
//!   │ Stopped │            │ Armed  │ ── tick ──▶ revalidate()
//!   └─────────┘ ◀───────── └────────┘
//!           stop() / drop
//! ```
//!
//! `start()` on an armed watchdog and `stop()` on a stopped one are
//! no-ops, so repeated login/logout cycles never stack timers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::context::{Revalidation, SessionContext};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the session watchdog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogConfig {
    /// Time between revalidations.
    pub interval: Duration,
}

impl WatchdogConfig {
    /// Shortest interval the timer runs with.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

    /// Longest interval the timer runs with.
    pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

    /// Creates a config with the given tick interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }

    /// Returns the interval clamped to `MIN_INTERVAL..=MAX_INTERVAL`.
    pub fn effective_interval(&self) -> Duration {
        self.interval.clamp(Self::MIN_INTERVAL, Self::MAX_INTERVAL)
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self::with_interval(Duration::from_secs(60))
    }
}

// =============================================================================
// State & Metrics
// =============================================================================

/// Whether the periodic task is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogState {
    /// The timer is running.
    Armed,
    /// The timer is cleared.
    Stopped,
}

#[derive(Debug, Default)]
struct WatchdogMetrics {
    ticks: AtomicU64,
    logouts: AtomicU64,
    starts: AtomicU64,
    stops: AtomicU64,
}

impl WatchdogMetrics {
    fn snapshot(&self) -> WatchdogMetricsSnapshot {
        WatchdogMetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            logouts: self.logouts.load(Ordering::Relaxed),
            starts: self.starts.load(Ordering::Relaxed),
            stops: self.stops.load(Ordering::Relaxed),
        }
    }
}

/// Counters collected by the watchdog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchdogMetricsSnapshot {
    /// Revalidations performed.
    pub ticks: u64,
    /// Logouts triggered by a revalidation.
    pub logouts: u64,
    /// Times the watchdog was armed.
    pub starts: u64,
    /// Times the watchdog was stopped.
    pub stops: u64,
}

struct ArmedTask {
    handle: JoinHandle<()>,
    shutdown: Arc<Notify>,
}

// =============================================================================
// SessionWatchdog
// =============================================================================

/// Periodically revalidates the session owned by a [`SessionContext`].
///
/// The watchdog stops itself when dropped, so its owner's scope bounds the
/// lifetime of the periodic task.
pub struct SessionWatchdog {
    context: Arc<SessionContext>,
    config: WatchdogConfig,
    task: Mutex<Option<ArmedTask>>,
    metrics: Arc<WatchdogMetrics>,
}

impl SessionWatchdog {
    /// Creates a stopped watchdog.
    pub fn new(context: Arc<SessionContext>, config: WatchdogConfig) -> Self {
        Self {
            context,
            config,
            task: Mutex::new(None),
            metrics: Arc::new(WatchdogMetrics::default()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    /// Returns the current state.
    pub fn state(&self) -> WatchdogState {
        match self.task.lock().as_ref() {
            Some(task) if !task.handle.is_finished() => WatchdogState::Armed,
            _ => WatchdogState::Stopped,
        }
    }

    /// Returns `true` if armed.
    pub fn is_armed(&self) -> bool {
        self.state() == WatchdogState::Armed
    }

    /// Returns a snapshot of the counters.
    pub fn metrics(&self) -> WatchdogMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Arms the watchdog. Must be called from within a Tokio runtime.
    ///
    /// Returns `false` if it was already armed.
    pub fn start(&self) -> bool {
        let mut task = self.task.lock();
        if matches!(task.as_ref(), Some(t) if !t.handle.is_finished()) {
            return false;
        }

        let context = self.context.clone();
        let metrics = self.metrics.clone();
        let period = self.config.effective_interval();
        let shutdown = Arc::new(Notify::new());
        let stop_signal = shutdown.clone();

        let handle = tokio::spawn(async move {
            debug!(interval_ms = period.as_millis() as u64, "Session watchdog armed");

            let now = Instant::now();
            let first = now.checked_add(period).unwrap_or(now);
            let mut interval = tokio::time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        Self::tick(&context, &metrics);
                    }
                    _ = stop_signal.notified() => {
                        break;
                    }
                }
            }

            debug!("Session watchdog loop exited");
        });

        self.metrics.starts.fetch_add(1, Ordering::Relaxed);
        *task = Some(ArmedTask { handle, shutdown });
        true
    }

    /// Stops the watchdog.
    ///
    /// Returns `false` if it was not armed.
    pub fn stop(&self) -> bool {
        let Some(task) = self.task.lock().take() else {
            return false;
        };

        task.shutdown.notify_one();
        task.handle.abort();
        self.metrics.stops.fetch_add(1, Ordering::Relaxed);
        debug!("Session watchdog stopped");
        true
    }

    /// Runs one revalidation immediately.
    pub fn check_now(&self) -> Revalidation {
        Self::tick(&self.context, &self.metrics)
    }

    fn tick(context: &SessionContext, metrics: &WatchdogMetrics) -> Revalidation {
        metrics.ticks.fetch_add(1, Ordering::Relaxed);

        let outcome = context.revalidate();
        if outcome == Revalidation::LoggedOut {
            metrics.logouts.fetch_add(1, Ordering::Relaxed);
            info!("Session watchdog detected an invalid session");
        }
        outcome
    }
}

impl Drop for SessionWatchdog {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SessionWatchdog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionWatchdog")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("metrics", &self.metrics())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
