// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Configuration Integration Tests
//!
//! - `test_config_*`: loading, overrides and validation
//! - `test_shell_config_*`: configuration flowing into the shell

use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use rocket_auth::View;
use rocket_config::{ConfigError, ConfigFormat, ConfigLoader, GateConfig, LogFormat, LogLevel};
use rocket_core::LegacySessionPolicy;
use rocket_session::Storage;
use rocket_tests::prelude::*;

fn loader() -> ConfigLoader {
    ConfigLoader::new().with_env_vars(false)
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_config_defaults_without_file() {
    let config = loader().load_or_default(None).unwrap();

    assert_eq!(config.api.base_url, "http://localhost:3000");
    assert_eq!(config.session.lifetime(), DAY * 25);
    assert_eq!(config.session.watchdog_interval(), Duration::from_secs(60));
    assert_eq!(config.session.user_key, "user");
    assert_eq!(config.session.token_key, "token");
    assert_eq!(config.session.legacy_sessions, LegacySessionPolicy::Accept);
    assert!(config.demo.enabled);
}

#[test]
fn test_config_yaml_file_resolves_relative_storage_dir() {
    let dir = temp_test_dir("rocket-config");
    let path = dir.path().join("rocket.yaml");
    fs::write(
        &path,
        r#"
api:
  base_url: https://crm.example.com/api
  request_timeout_secs: 10
session:
  storage_dir: state
  lifetime_days: 7
  legacy_sessions: reject
demo:
  enabled: false
logging:
  level: debug
  format: json
"#,
    )
    .unwrap();

    let config = loader().load(&path).unwrap();
    assert_eq!(config.api.base_url, "https://crm.example.com/api");
    assert_eq!(config.api.request_timeout(), Duration::from_secs(10));
    assert_eq!(config.session.storage_dir, dir.path().join("state"));
    assert_eq!(config.session.lifetime(), DAY * 7);
    assert_eq!(config.session.legacy_sessions, LegacySessionPolicy::Reject);
    assert!(!config.demo.enabled);
    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_config_toml_and_json_agree() {
    let toml = r#"
[api]
base_url = "https://crm.example.com"

[session]
watchdog_interval_secs = 15
"#;
    let json = r#"{"api": {"base_url": "https://crm.example.com"}, "session": {"watchdog_interval_secs": 15}}"#;

    let from_toml = loader().load_from_str(toml, ConfigFormat::Toml).unwrap();
    let from_json = loader().load_from_str(json, ConfigFormat::Json).unwrap();
    assert_eq!(from_toml, from_json);
    assert_eq!(from_toml.session.watchdog_interval(), Duration::from_secs(15));
}

#[test]
fn test_config_missing_file() {
    let err = loader().load("/nonexistent/rocket.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn test_config_unknown_field_rejected() {
    let err = loader()
        .load_from_str(r#"{"session": {"expiry": 3}}"#, ConfigFormat::Json)
        .unwrap_err();
    assert!(!err.is_validation());
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_config_rejects_invalid_values() {
    let cases = [
        r#"{"api": {"base_url": "ftp://crm.example.com"}}"#,
        r#"{"api": {"request_timeout_secs": 0}}"#,
        r#"{"session": {"lifetime_days": 0}}"#,
        r#"{"session": {"watchdog_interval_secs": 0}}"#,
        r#"{"session": {"user_key": "session", "token_key": "session"}}"#,
        r#"{"session": {"token_key": "../token"}}"#,
    ];

    for case in cases {
        let err = loader()
            .load_from_str(case, ConfigFormat::Json)
            .unwrap_err();
        assert!(err.is_validation(), "{} should fail validation", case);
    }
}

// =============================================================================
// Environment Overrides
// =============================================================================

#[test]
fn test_config_env_overrides() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("ROCKET_API_BASE_URL", "https://override.example.com"),
        ("ROCKET_SESSION_LIFETIME_DAYS", "3"),
        ("ROCKET_WATCHDOG_INTERVAL_SECS", "5"),
        ("ROCKET_LEGACY_SESSIONS", "reject"),
        ("ROCKET_DEMO_ENABLED", "false"),
        ("ROCKET_LOG_FORMAT", "compact"),
    ]);

    let mut config = GateConfig::default();
    loader()
        .apply_overrides_from(&mut config, |name| env.get(name).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.api.base_url, "https://override.example.com");
    assert_eq!(config.session.lifetime_days, 3);
    assert_eq!(config.session.watchdog_interval_secs, 5);
    assert_eq!(config.session.legacy_sessions, LegacySessionPolicy::Reject);
    assert!(!config.demo.enabled);
    assert_eq!(config.logging.format, LogFormat::Compact);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_env_override_with_custom_prefix() {
    let mut config = GateConfig::default();
    loader()
        .with_env_prefix("CRM")
        .apply_overrides_from(&mut config, |name| {
            (name == "CRM_WATCHDOG_INTERVAL_SECS").then(|| "30".to_string())
        })
        .unwrap();

    assert_eq!(config.session.watchdog_interval_secs, 30);
}

#[test]
fn test_config_env_override_bad_number() {
    let mut config = GateConfig::default();
    let err = loader()
        .apply_overrides_from(&mut config, |name| {
            (name == "ROCKET_SESSION_LIFETIME_DAYS").then(|| "forever".to_string())
        })
        .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
}

// =============================================================================
// Shell Configuration
// =============================================================================

#[tokio::test]
async fn test_shell_config_custom_keys_and_lifetime() {
    let mut config = GateConfig::default();
    config.session.user_key = "crm_user".to_string();
    config.session.token_key = "crm_token".to_string();
    config.session.lifetime_days = 2;

    let harness = GateHarness::new();
    let shell = harness.shell_with(config);
    let outcome = shell.login(&CredentialFixtures::demo()).await.unwrap();

    assert_eq!(outcome.expires_at, START_MS + (DAY * 2).as_millis() as i64);
    assert!(harness.storage.get("crm_user").unwrap().is_some());
    assert_eq!(
        harness.storage.get("crm_token").unwrap().as_deref(),
        Some("demo-access-token")
    );
    assert!(harness.storage.get("user").unwrap().is_none());
}

#[tokio::test]
async fn test_shell_config_demo_disabled_goes_to_api() {
    let mut config = GateConfig::default();
    config.demo.enabled = false;

    let harness = GateHarness::new();
    let shell = harness.shell_with(config);
    let err = shell.login(&CredentialFixtures::demo()).await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(harness.api.login_calls(), 1);
    assert_eq!(shell.current_view(), View::Login);
}

#[tokio::test]
async fn test_shell_config_file_storage() {
    let dir = temp_test_dir("rocket-shell");
    let mut config = GateConfig::default();
    config.session.storage_dir = dir.path().join("session");

    {
        let shell = rocket_bin::Shell::builder()
            .config(config.clone())
            .api(std::sync::Arc::new(MockApiClient::new()))
            .build()
            .unwrap();
        shell.login(&CredentialFixtures::demo()).await.unwrap();
    }

    assert!(dir.path().join("session").join("user").exists());

    let shell = rocket_bin::Shell::builder()
        .config(config)
        .api(std::sync::Arc::new(MockApiClient::new()))
        .build()
        .unwrap();
    assert_eq!(shell.start(), View::Dashboard);
    shell.context().assert_logged_in_as("admin");
}

#[test]
fn test_shell_config_invalid_is_rejected() {
    let mut config = GateConfig::default();
    config.session.watchdog_interval_secs = 0;

    let result = rocket_bin::Shell::builder()
        .config(config)
        .storage(std::sync::Arc::new(rocket_session::MemoryStorage::new()))
        .api(std::sync::Arc::new(MockApiClient::new()))
        .build();
    assert!(matches!(result, Err(rocket_bin::BinError::Config(_))));
}
