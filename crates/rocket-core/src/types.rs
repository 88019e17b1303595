// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session data types.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifetime granted to every new session (25 days).
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(25 * 24 * 60 * 60);

// =============================================================================
// UserProfile
// =============================================================================

/// Identity attributes of the signed-in user.
///
/// The role is kept as the raw string returned by the API; it is only
/// interpreted (case-insensitively) when capabilities are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID. The API may send it as a number or a string.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Role name, free-form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Any other attributes the API attached to the user.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// Creates a profile with only an ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            role: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Returns the role string, if any.
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Returns the best human-readable label for this user.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.id)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

// =============================================================================
// SessionRecord
// =============================================================================

/// An authenticated session: identity, bearer token and expiry.
///
/// A record is always complete. Storage layers that find only half of it
/// report the session as absent instead of building a partial record.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    /// The signed-in user.
    pub user: UserProfile,
    /// Opaque bearer token for the external API.
    pub issued_token: String,
    /// Expiry in milliseconds since the Unix epoch. `None` for records
    /// written before expiry was tracked.
    pub expires_at: Option<i64>,
}

impl SessionRecord {
    /// Creates a record from its parts.
    pub fn new(user: UserProfile, issued_token: impl Into<String>, expires_at: Option<i64>) -> Self {
        Self {
            user,
            issued_token: issued_token.into(),
            expires_at,
        }
    }

    /// Issues a fresh record that expires `lifetime` after `now_millis`.
    pub fn issue(
        user: UserProfile,
        issued_token: impl Into<String>,
        now_millis: i64,
        lifetime: Duration,
    ) -> Self {
        let lifetime_ms = i64::try_from(lifetime.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now_millis.saturating_add(lifetime_ms);
        Self::new(user, issued_token, Some(expires_at))
    }

    /// Returns `true` if the record carries an expiry and it has passed.
    ///
    /// The boundary instant itself is still valid.
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        matches!(self.expires_at, Some(exp) if now_millis > exp)
    }

    /// Returns `true` if the record predates expiry tracking.
    pub fn is_legacy(&self) -> bool {
        self.expires_at.is_none()
    }

    /// Returns the role string of the user.
    pub fn role(&self) -> Option<&str> {
        self.user.role()
    }

    /// Returns the expiry as a `DateTime`.
    pub fn expires_at_datetime(&self) -> Option<DateTime<Utc>> {
        self.expires_at.and_then(DateTime::from_timestamp_millis)
    }

    /// Returns the time left before expiry, or `None` if already expired
    /// or non-expiring.
    pub fn time_remaining(&self, now_millis: i64) -> Option<Duration> {
        match self.expires_at {
            Some(exp) if exp > now_millis => Some(Duration::from_millis((exp - now_millis) as u64)),
            _ => None,
        }
    }
}

// =============================================================================
// LegacySessionPolicy
// =============================================================================

/// How to treat a stored session that has no expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacySessionPolicy {
    /// Keep it valid indefinitely.
    #[default]
    Accept,
    /// Treat it as expired and clear it.
    Reject,
}

impl LegacySessionPolicy {
    /// Parses a policy name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "accept" | "allow" => Some(Self::Accept),
            "reject" | "deny" => Some(Self::Reject),
            _ => None,
        }
    }

    /// Returns the policy name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for LegacySessionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifetime_is_25_days() {
        assert_eq!(DEFAULT_SESSION_LIFETIME.as_millis(), 25 * 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_record_expiry_boundary() {
        let record = SessionRecord::new(UserProfile::new("1"), "t", Some(1_000));

        assert!(!record.is_expired_at(999));
        assert!(!record.is_expired_at(1_000));
        assert!(record.is_expired_at(1_001));
        assert_eq!(record.time_remaining(400), Some(Duration::from_millis(600)));
        assert_eq!(record.time_remaining(1_000), None);
    }

    #[test]
    fn test_huge_lifetime_saturates() {
        let user = UserProfile::new("1");
        let record = SessionRecord::issue(user.clone(), "t", 1_000, Duration::MAX);
        assert_eq!(record.expires_at, Some(i64::MAX));
        assert!(!record.is_expired_at(1_000));

        let record = SessionRecord::issue(user, "t", 1_000, Duration::from_secs(u64::MAX / 2));
        assert_eq!(record.expires_at, Some(i64::MAX));
    }

    #[test]
    fn test_legacy_record_never_expires() {
        let record = SessionRecord::new(UserProfile::new("1"), "t", None);

        assert!(record.is_legacy());
        assert!(!record.is_expired_at(i64::MAX));
        assert!(record.time_remaining(0).is_none());
    }

    #[test]
    fn test_user_id_accepts_numbers() {
        let user: UserProfile =
            serde_json::from_str(r#"{"id": 17, "name": "Mona", "role": "sales_rep"}"#).unwrap();

        assert_eq!(user.id, "17");
        assert_eq!(user.role(), Some("sales_rep"));
        assert!(user.email.is_none());
    }

    #[test]
    fn test_user_keeps_unknown_fields() {
        let user: UserProfile =
            serde_json::from_str(r#"{"id": "a", "username": "mona", "teamMembers": []}"#).unwrap();

        assert_eq!(user.extra.get("username").and_then(|v| v.as_str()), Some("mona"));

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "mona");
        assert!(json.get("role").is_none());
    }

    #[test]
    fn test_legacy_policy_parse() {
        assert_eq!(LegacySessionPolicy::parse("Accept"), Some(LegacySessionPolicy::Accept));
        assert_eq!(LegacySessionPolicy::parse("reject"), Some(LegacySessionPolicy::Reject));
        assert_eq!(LegacySessionPolicy::parse("maybe"), None);
        assert_eq!(LegacySessionPolicy::default(), LegacySessionPolicy::Accept);
    }
}
