// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file (or start from defaults when there is none)
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders
//! 3. Parse YAML, TOML or JSON by extension
//! 4. Apply `ROCKET_*` environment overrides
//! 5. Resolve the session directory against the config file's directory
//! 6. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! ROCKET_API_BASE_URL=https://crm.example.com/api
//! ROCKET_API_TIMEOUT_SECS=10
//! ROCKET_SESSION_DIR=/var/lib/rocket/session
//! ROCKET_SESSION_LIFETIME_DAYS=7
//! ROCKET_WATCHDOG_INTERVAL_SECS=30
//! ROCKET_LEGACY_SESSIONS=reject
//! ROCKET_DEMO_ENABLED=false
//! ROCKET_LOG_LEVEL=debug
//! ROCKET_LOG_FORMAT=json
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use rocket_core::LegacySessionPolicy;

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{GateConfig, LogFormat, LogLevel};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "ROCKET";

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// ```no_run
/// use rocket_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("rocket.yaml").unwrap();
/// println!("API: {}", config.api.base_url);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Base directory for resolving relative paths.
    base_path: Option<PathBuf>,

    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to read the environment at all.
    resolve_env_vars: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            base_path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
        }
    }

    /// Sets the base path for resolving relative paths.
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment placeholders and overrides.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Returns the environment variable prefix.
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Loads configuration from a file.
    ///
    /// The format is chosen by extension: `.yaml`/`.yml`, `.toml` or `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<GateConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let base_path = self.base_path.clone().unwrap_or_else(|| {
            path.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        });

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let content = self.resolve_placeholders(&content);
        let mut config: GateConfig = parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;

        self.finish(&mut config, Some(&base_path))?;

        debug!(
            base_url = %config.api.base_url,
            storage_dir = %config.session.storage_dir.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<GateConfig> {
        let content = self.resolve_placeholders(content);
        let mut config: GateConfig = parse_str(&content, format)?;
        self.finish(&mut config, self.base_path.as_deref())?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise starts from defaults.
    ///
    /// Environment overrides and validation apply either way.
    pub fn load_or_default(&self, path: Option<&Path>) -> ConfigResult<GateConfig> {
        match path {
            Some(path) => self.load(path),
            None => {
                debug!("No configuration file given, using defaults");
                let mut config = GateConfig::default();
                self.finish(&mut config, self.base_path.as_deref())?;
                Ok(config)
            }
        }
    }

    /// Applies overrides read through `lookup` instead of the process
    /// environment.
    pub fn apply_overrides_from<F>(&self, config: &mut GateConfig, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |suffix: &str| format!("{}_{}", self.env_prefix, suffix);

        if let Some(value) = lookup(&key("API_BASE_URL")) {
            config.api.base_url = value;
        }
        if let Some(value) = lookup(&key("API_TIMEOUT_SECS")) {
            config.api.request_timeout_secs = parse_number(&key("API_TIMEOUT_SECS"), &value)?;
        }
        if let Some(value) = lookup(&key("SESSION_DIR")) {
            config.session.storage_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(&key("SESSION_LIFETIME_DAYS")) {
            config.session.lifetime_days = parse_number(&key("SESSION_LIFETIME_DAYS"), &value)?;
        }
        if let Some(value) = lookup(&key("WATCHDOG_INTERVAL_SECS")) {
            config.session.watchdog_interval_secs =
                parse_number(&key("WATCHDOG_INTERVAL_SECS"), &value)?;
        }
        if let Some(value) = lookup(&key("LEGACY_SESSIONS")) {
            config.session.legacy_sessions = LegacySessionPolicy::parse(&value).ok_or_else(|| {
                ConfigError::invalid_env_var(key("LEGACY_SESSIONS"), "expected accept or reject")
            })?;
        }
        if let Some(value) = lookup(&key("DEMO_ENABLED")) {
            config.demo.enabled = parse_bool(&value);
        }
        if let Some(value) = lookup(&key("LOG_LEVEL")) {
            match LogLevel::parse(&value) {
                Some(level) => config.logging.level = level,
                None => warn!(value = %value, "Ignoring unknown log level override"),
            }
        }
        if let Some(value) = lookup(&key("LOG_FORMAT")) {
            match LogFormat::parse(&value) {
                Some(format) => config.logging.format = format,
                None => warn!(value = %value, "Ignoring unknown log format override"),
            }
        }

        Ok(())
    }

    /// Overrides, path resolution and validation shared by every entry point.
    fn finish(&self, config: &mut GateConfig, base_path: Option<&Path>) -> ConfigResult<()> {
        if self.resolve_env_vars {
            self.apply_overrides_from(config, |name| env::var(name).ok())?;
        }
        if let Some(base) = base_path {
            if config.session.storage_dir.is_relative() {
                config.session.storage_dir = base.join(&config.session.storage_dir);
            }
        }
        config.validate()
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    fn resolve_placeholders(&self, content: &str) -> String {
        if self.resolve_env_vars {
            resolve_env_placeholders(content, |name| env::var(name).ok())
        } else {
            content.to_string()
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> ConfigResult<T> {
    match format {
        ConfigFormat::Yaml => parse_yaml(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// YAML goes through the `config` crate.
fn parse_yaml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

/// Resolves `${VAR}` and `${VAR:default}` placeholders.
///
/// Unknown variables without a default are left in place.
fn resolve_env_placeholders<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            result.push_str(&rest[start..]);
            return result;
        };

        let inner = &after[..end];
        let (name, default) = match inner.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (inner, None),
        };

        match (lookup(name), default) {
            (Some(value), _) => result.push_str(&value),
            (None, Some(default)) => result.push_str(default),
            (None, None) => {
                warn!(name = name, "Environment variable not found");
                result.push_str(&rest[start..start + 2 + end + 1]);
            }
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    result
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "enabled"
    )
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid_env_var(name, "expected a non-negative number"))
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<GateConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<GateConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn test_yaml() -> &'static str {
        r#"
api:
  base_url: https://crm.example.com/api
  request_timeout_secs: 10

session:
  storage_dir: /tmp/rocket-session
  lifetime_days: 7
  watchdog_interval_secs: 30
  legacy_sessions: reject

demo:
  enabled: false

logging:
  level: debug
  format: json
"#
    }

    fn isolated() -> ConfigLoader {
        ConfigLoader::new().with_env_vars(false)
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(test_yaml().as_bytes()).unwrap();

        let config = isolated().load(file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://crm.example.com/api");
        assert_eq!(config.api.request_timeout_secs, 10);
        assert_eq!(config.session.lifetime_days, 7);
        assert_eq!(config.session.watchdog_interval_secs, 30);
        assert_eq!(config.session.legacy_sessions, LegacySessionPolicy::Reject);
        assert!(!config.demo.enabled);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_toml_and_json() {
        let toml = "[api]\nbase_url = \"http://10.0.0.5:3000\"\n";
        let config = isolated().load_from_str(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:3000");
        assert_eq!(config.session.token_key, "token");

        let json = r#"{"session": {"user_key": "crm_user"}}"#;
        let config = isolated().load_from_str(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.session.user_key, "crm_user");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{"api": {"port": 8080}}"#;
        assert!(isolated().load_from_str(json, ConfigFormat::Json).is_err());
    }

    #[test]
    fn test_relative_storage_dir_resolved_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rocket.toml");
        fs::write(&path, "[session]\nstorage_dir = \"state\"\n").unwrap();

        let config = isolated().load(&path).unwrap();
        assert_eq!(config.session.storage_dir, dir.path().join("state"));
    }

    #[test]
    fn test_defaults_without_file() {
        let config = isolated().load_or_default(None).unwrap();
        assert_eq!(config, GateConfig::default());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("ROCKET_API_BASE_URL", "https://override.example.com"),
            ("ROCKET_WATCHDOG_INTERVAL_SECS", "5"),
            ("ROCKET_LEGACY_SESSIONS", "deny"),
            ("ROCKET_DEMO_ENABLED", "no"),
            ("ROCKET_LOG_FORMAT", "compact"),
        ]
        .into_iter()
        .collect();

        let mut config = GateConfig::default();
        isolated()
            .apply_overrides_from(&mut config, |k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.base_url, "https://override.example.com");
        assert_eq!(config.session.watchdog_interval_secs, 5);
        assert_eq!(config.session.legacy_sessions, LegacySessionPolicy::Reject);
        assert!(!config.demo.enabled);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_invalid_numeric_override() {
        let mut config = GateConfig::default();
        let err = isolated()
            .apply_overrides_from(&mut config, |k| {
                (k == "ROCKET_API_TIMEOUT_SECS").then(|| "soon".to_string())
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
    }

    #[test]
    fn test_placeholders() {
        let lookup = |name: &str| (name == "CRM_HOST").then(|| "crm.local".to_string());

        assert_eq!(
            resolve_env_placeholders("url: http://${CRM_HOST}/api", lookup),
            "url: http://crm.local/api"
        );
        assert_eq!(
            resolve_env_placeholders("dir: ${STATE_DIR:/var/lib/rocket}", lookup),
            "dir: /var/lib/rocket"
        );
        assert_eq!(
            resolve_env_placeholders("x: ${MISSING} y: ${UNCLOSED", lookup),
            "x: ${MISSING} y: ${UNCLOSED"
        );
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("rocket.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("rocket.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(ConfigFormat::from_path(Path::new("rocket.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("rocket")).is_err());
    }

    #[test]
    fn test_file_not_found() {
        let result = isolated().load("/nonexistent/rocket.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("on"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool(""));
    }
}
