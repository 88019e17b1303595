// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Session Integration Tests
//!
//! - `test_store_*`: persistence through the storage boundary
//! - `test_validity_*`: expiry and legacy sessions
//! - `test_context_*`: restore and logout across context instances
//! - `test_watchdog_*`: periodic revalidation with paused time

use std::sync::Arc;
use std::time::Duration;

use rocket_core::LegacySessionPolicy;
use rocket_session::{
    FileStorage, LogoutReason, Revalidation, SessionContext, SessionStatus, SessionStore,
    Storage, WatchdogState,
};
use rocket_tests::prelude::*;

// =============================================================================
// Session Store
// =============================================================================

#[test]
fn test_store_save_replaces_previous_record() {
    let harness = GateHarness::new();
    let store = harness.store();

    store
        .save(&SessionRecordBuilder::new().role("sales_rep").token("first").build())
        .unwrap();
    store
        .save(&SessionRecordBuilder::new().role("admin").token("second").build())
        .unwrap();

    let record = store.load().unwrap();
    assert_eq!(record.role(), Some("admin"));
    assert_eq!(record.issued_token, "second");
    assert_eq!(harness.storage.len(), 2);
}

#[test]
fn test_store_writes_wire_format() {
    let harness = GateHarness::new();
    harness
        .store()
        .save(&SessionRecordBuilder::new().expires_at(1_234).build())
        .unwrap();

    let raw = harness.storage.get("user").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["expirationTime"], 1_234);
    assert_eq!(json["role"], "admin");
    assert_eq!(
        harness.storage.get("token").unwrap().as_deref(),
        Some("token-abc")
    );
}

#[test]
fn test_store_reads_numeric_user_id() {
    let harness = GateHarness::new();
    StorageSeeder::new(harness.storage.as_ref())
        .user_json(r#"{"id": 42, "role": "team_leader", "expirationTime": 1800000000000}"#)
        .token("t");

    let record = harness.store().load().unwrap();
    assert_eq!(record.user.id, "42");
    assert_eq!(record.expires_at, Some(1_800_000_000_000));
}

#[test]
fn test_store_malformed_payload_is_absent() {
    let harness = GateHarness::new();
    StorageSeeder::new(harness.storage.as_ref())
        .user_json("{not json")
        .token("t");

    assert!(harness.store().load().is_none());
    assert!(matches!(
        harness.validator().check(&harness.store()),
        SessionStatus::Absent
    ));
}

#[test]
fn test_store_user_without_token_is_absent() {
    let harness = GateHarness::new();
    StorageSeeder::new(harness.storage.as_ref())
        .user_json(r#"{"id": "u-1", "role": "admin"}"#);

    assert!(harness.store().load().is_none());
}

#[test]
fn test_store_clear_twice_is_idempotent() {
    let harness = GateHarness::new();
    let store = harness.store();
    store.save(&SessionRecordBuilder::new().build()).unwrap();

    store.clear().unwrap();
    assert!(store.load().is_none());
    store.clear().unwrap();
    assert!(store.load().is_none());
    assert!(harness.storage.is_empty());
}

#[test]
fn test_store_failed_write_leaves_no_partial_record() {
    let storage = Arc::new(FailingStorage::new());
    let store = SessionStore::new(storage.clone());
    storage.fail_writes(true);

    assert!(store.save(&SessionRecordBuilder::new().build()).is_err());
    assert!(store.load().is_none());
    assert!(storage.is_empty());
}

#[test]
fn test_store_file_backend_survives_reopen() {
    let dir = temp_test_dir("rocket-session");
    let record = SessionRecordBuilder::new().role("sales_admin").build();

    {
        let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
        SessionStore::new(storage).save(&record).unwrap();
    }

    let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
    let loaded = SessionStore::new(storage).load().unwrap();
    assert_eq!(loaded, record);
}

// =============================================================================
// Validity Checker
// =============================================================================

#[test]
fn test_validity_past_expiry_is_invalid_and_cleared() {
    let harness = GateHarness::new();
    let store = harness.store();

    for before in [Duration::from_millis(1), Duration::from_secs(60), DAY * 30] {
        store
            .save(&SessionRecordBuilder::new().expired_before_start(before).build())
            .unwrap();
        assert!(!harness.validator().is_valid(&store));
        assert!(store.load().is_none());
        assert!(harness.storage.is_empty());
    }
}

#[test]
fn test_validity_future_expiry_is_valid_and_untouched() {
    let harness = GateHarness::new();
    let store = harness.store();

    for after in [Duration::from_millis(1), Duration::from_secs(60), DAY * 25] {
        let record = SessionRecordBuilder::new().expires_after_start(after).build();
        store.save(&record).unwrap();
        let before = harness.storage.get("user").unwrap();

        assert!(harness.validator().is_valid(&store));
        assert_eq!(harness.storage.get("user").unwrap(), before);
        assert_eq!(store.load(), Some(record));
    }
}

#[test]
fn test_validity_expiry_boundary_is_still_valid() {
    let harness = GateHarness::new();
    let store = harness.store();
    store
        .save(&SessionRecordBuilder::new().expires_at(START_MS).build())
        .unwrap();

    assert!(harness.validator().is_valid(&store));
    harness.advance(Duration::from_millis(1));
    assert!(!harness.validator().is_valid(&store));
}

#[test]
fn test_validity_legacy_session_accepted_by_default() {
    let harness = GateHarness::new();
    let store = harness.store();
    store
        .save(&SessionRecordBuilder::new().legacy().build())
        .unwrap();

    harness.advance(DAY * 3650);
    assert!(harness.validator().is_valid(&store));
}

#[test]
fn test_validity_legacy_session_rejected_when_configured() {
    let harness = GateHarness::new().with_policy(LegacySessionPolicy::Reject);
    let store = harness.store();
    store
        .save(&SessionRecordBuilder::new().legacy().build())
        .unwrap();

    assert!(matches!(harness.validator().check(&store), SessionStatus::Expired));
    assert!(store.load().is_none());
}

// =============================================================================
// Session Context
// =============================================================================

#[test]
fn test_context_restores_valid_session_on_open() {
    let harness = GateHarness::new();
    harness
        .store()
        .save(&SessionRecordBuilder::new().role("team_leader").build())
        .unwrap();

    let context = harness.context();
    context.assert_logged_in_as("team_leader");
}

#[test]
fn test_context_does_not_restore_expired_session() {
    let harness = GateHarness::new();
    harness
        .store()
        .save(&SessionRecordBuilder::new().expired_before_start(DAY).build())
        .unwrap();

    let context = harness.context();
    context.assert_logged_out();
    assert!(harness.storage.is_empty());
}

#[test]
fn test_context_logout_clears_everything() {
    let harness = GateHarness::new();
    let context = harness.context();
    context
        .establish(SessionRecordBuilder::new().build())
        .unwrap();

    assert!(context.logout(LogoutReason::UserRequested).unwrap());
    context.assert_logged_out();
    assert!(!context.logout(LogoutReason::UserRequested).unwrap());

    harness.context().assert_logged_out();
}

#[test]
fn test_context_establish_failure_changes_nothing() {
    let storage = Arc::new(FailingStorage::new());
    let harness = GateHarness::new();
    let context = SessionContext::new(SessionStore::new(storage.clone()), harness.validator());
    storage.fail_writes(true);

    assert!(context
        .establish(SessionRecordBuilder::new().build())
        .is_err());
    assert!(!context.is_logged_in());
    assert!(storage.is_empty());
}

#[test]
fn test_context_subscribers_see_logout() {
    let harness = GateHarness::new();
    let context = harness.context();
    context
        .establish(SessionRecordBuilder::new().build())
        .unwrap();

    let rx = context.subscribe();
    assert!(*rx.borrow());
    context.handle_unauthorized();
    assert!(!*rx.borrow());
}

// =============================================================================
// Session Watchdog
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_watchdog_logs_out_exactly_once() {
    init_test_logging();
    let harness = GateHarness::new();
    let context = harness.context();
    context
        .establish(
            SessionRecordBuilder::new()
                .expires_after_start(Duration::from_secs(90))
                .build(),
        )
        .unwrap();

    let watchdog = harness.watchdog(&context, Duration::from_secs(60));
    assert!(watchdog.start());
    let mut logged_in = context.subscribe();

    // First tick at 60s: still valid.
    harness.advance(Duration::from_secs(60));
    tokio::time::sleep(Duration::from_secs(61)).await;
    assert!(context.is_logged_in());

    // Expiry falls between the first and second tick.
    harness.advance(Duration::from_secs(60));
    logged_in.changed().await.unwrap();
    assert!(!*logged_in.borrow_and_update());

    // Further ticks find nothing to do.
    tokio::time::sleep(Duration::from_secs(300)).await;
    let metrics = watchdog.metrics();
    assert_eq!(metrics.logouts, 1);
    assert!(metrics.ticks >= 6);
    assert!(!logged_in.has_changed().unwrap());
    context.assert_logged_out();
}

#[tokio::test(start_paused = true)]
async fn test_watchdog_concurrent_checks_log_out_once() {
    let harness = GateHarness::new();
    let context = harness.context();
    context
        .establish(SessionRecordBuilder::new().build())
        .unwrap();
    harness.advance(DAY * 2);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let context = context.clone();
            tokio::spawn(async move { context.revalidate() })
        })
        .collect();

    let mut logouts = 0;
    for handle in handles {
        if handle.await.unwrap() == Revalidation::LoggedOut {
            logouts += 1;
        }
    }
    assert_eq!(logouts, 1);
}

#[tokio::test(start_paused = true)]
async fn test_watchdog_stop_and_restart_cycles() {
    let harness = GateHarness::new();
    let context = harness.context();
    let watchdog = harness.watchdog(&context, Duration::from_secs(60));

    for _ in 0..3 {
        assert!(watchdog.start());
        assert!(!watchdog.start());
        assert_eq!(watchdog.state(), WatchdogState::Armed);
        assert!(watchdog.stop());
        assert!(!watchdog.stop());
    }

    let metrics = watchdog.metrics();
    assert_eq!(metrics.starts, 3);
    assert_eq!(metrics.stops, 3);
}

#[tokio::test(start_paused = true)]
async fn test_watchdog_dropped_with_owner() {
    let harness = GateHarness::new();
    let context = harness.context();
    context
        .establish(SessionRecordBuilder::new().build())
        .unwrap();

    {
        let watchdog = harness.watchdog(&context, Duration::from_secs(60));
        watchdog.start();
    }

    harness.advance(DAY * 2);
    tokio::time::sleep(Duration::from_secs(600)).await;
    // No task survived the owner, so nothing flipped the flag.
    assert!(context.is_logged_in());
}
