// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route guard.
//!
//! Every navigation goes through [`RouteGuard`]. Decisions are recomputed
//! from the session context on each call and never cached, so a logout
//! from any source takes effect on the next navigation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rocket_session::SessionContext;

use crate::capability::{Capability, CapabilitySet};
use crate::rbac::capabilities_for;

// =============================================================================
// View
// =============================================================================

/// A navigable dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// The login form.
    Login,
    /// Overview with collection counts.
    Dashboard,
    /// User management.
    Users,
    /// Inventory listing.
    Inventory,
    /// Leads listing.
    Leads,
    /// Projects listing.
    Projects,
}

impl View {
    /// Returns the route path.
    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/",
            View::Dashboard => "/dashboard",
            View::Users => "/users",
            View::Inventory => "/inventory",
            View::Leads => "/leads",
            View::Projects => "/projects",
        }
    }

    /// Looks a view up by route path. A trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };
        View::all().iter().copied().find(|v| v.path() == path)
    }

    /// Parses a view name or route path.
    pub fn parse(s: &str) -> Option<Self> {
        if s.starts_with('/') {
            return Self::from_path(s);
        }
        match s.to_lowercase().as_str() {
            "login" => Some(View::Login),
            "dashboard" => Some(View::Dashboard),
            "users" => Some(View::Users),
            "inventory" => Some(View::Inventory),
            "leads" => Some(View::Leads),
            "projects" => Some(View::Projects),
            _ => None,
        }
    }

    /// Returns the view name.
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Login => "login",
            View::Dashboard => "dashboard",
            View::Users => "users",
            View::Inventory => "inventory",
            View::Leads => "leads",
            View::Projects => "projects",
        }
    }

    /// Returns the capability needed to open this view.
    ///
    /// `None` for the login view, which is public, and for the dashboard,
    /// which needs only a valid session.
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            View::Login | View::Dashboard => None,
            View::Users => Some(Capability::Users),
            View::Inventory => Some(Capability::Inventory),
            View::Leads => Some(Capability::Leads),
            View::Projects => Some(Capability::Projects),
        }
    }

    /// Returns `true` if the view requires a valid session.
    pub fn is_protected(&self) -> bool {
        *self != View::Login
    }

    /// Returns all views.
    pub fn all() -> &'static [View] {
        &[
            View::Login,
            View::Dashboard,
            View::Users,
            View::Inventory,
            View::Leads,
            View::Projects,
        ]
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// =============================================================================
// GuardDecision
// =============================================================================

/// Outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested view.
    Allow,
    /// Navigate to another view instead.
    RedirectTo(View),
}

impl GuardDecision {
    /// Returns `true` for [`GuardDecision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the view that ends up rendered for `requested`.
    pub fn target(&self, requested: View) -> View {
        match self {
            Self::Allow => requested,
            Self::RedirectTo(view) => *view,
        }
    }
}

// =============================================================================
// RouteGuard
// =============================================================================

/// Allows or redirects navigations.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Creates a guard.
    pub fn new() -> Self {
        Self
    }

    /// Decides a navigation from already-computed inputs.
    pub fn resolve(view: View, session_valid: bool, capabilities: &CapabilitySet) -> GuardDecision {
        if !view.is_protected() {
            return if session_valid {
                GuardDecision::RedirectTo(View::Dashboard)
            } else {
                GuardDecision::Allow
            };
        }

        if !session_valid {
            return GuardDecision::RedirectTo(View::Login);
        }
        match view.required_capability() {
            Some(required) if !capabilities.contains(required) => {
                GuardDecision::RedirectTo(View::Dashboard)
            }
            _ => GuardDecision::Allow,
        }
    }

    /// Decides a navigation against the live session.
    ///
    /// A session is valid only if the context is logged in and the stored
    /// record passes the validity check.
    pub fn evaluate(&self, context: &SessionContext, view: View) -> GuardDecision {
        let status = if context.is_logged_in() {
            context.check()
        } else {
            rocket_session::SessionStatus::Absent
        };

        let capabilities = capabilities_for(status.record().and_then(|r| r.role()));
        let decision = Self::resolve(view, status.is_valid(), &capabilities);

        debug!(
            view = view.as_str(),
            valid = status.is_valid(),
            capabilities = %capabilities,
            decision = ?decision,
            "Route evaluated"
        );
        decision
    }

    /// Returns the protected views the current session may open.
    pub fn menu(&self, context: &SessionContext) -> Vec<View> {
        View::all()
            .iter()
            .copied()
            .filter(|v| v.is_protected())
            .filter(|v| self.evaluate(context, *v).is_allowed())
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use rocket_core::{Clock, LegacySessionPolicy, ManualClock, SessionRecord, UserProfile};
    use rocket_session::{MemoryStorage, SessionStore, SessionValidator};

    fn context(clock: Arc<ManualClock>) -> SessionContext {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        SessionContext::new(store, SessionValidator::new(clock, LegacySessionPolicy::Accept))
    }

    fn login(ctx: &SessionContext, clock: &ManualClock, role: &str) {
        let user = UserProfile::new("7").with_role(role);
        let record = SessionRecord::issue(user, "tok", clock.now_millis(), Duration::from_secs(600));
        ctx.establish(record).unwrap();
    }

    #[test]
    fn test_view_paths_round_trip() {
        for view in View::all() {
            assert_eq!(View::from_path(view.path()), Some(*view));
        }
        assert_eq!(View::from_path("/leads/"), Some(View::Leads));
        assert_eq!(View::from_path("/reports"), None);
        assert_eq!(View::parse("Inventory"), Some(View::Inventory));
        assert_eq!(View::parse("/projects"), Some(View::Projects));
    }

    #[test]
    fn test_resolve_login_view() {
        let caps = capabilities_for(Some("admin"));
        assert_eq!(RouteGuard::resolve(View::Login, false, &caps), GuardDecision::Allow);
        assert_eq!(
            RouteGuard::resolve(View::Login, true, &caps),
            GuardDecision::RedirectTo(View::Dashboard)
        );
    }

    #[test]
    fn test_resolve_protected_views() {
        let caps = capabilities_for(Some("team_leader"));

        assert_eq!(
            RouteGuard::resolve(View::Leads, false, &caps),
            GuardDecision::RedirectTo(View::Login)
        );
        assert_eq!(RouteGuard::resolve(View::Leads, true, &caps), GuardDecision::Allow);
        assert_eq!(
            RouteGuard::resolve(View::Projects, true, &caps),
            GuardDecision::RedirectTo(View::Dashboard)
        );
        assert_eq!(RouteGuard::resolve(View::Dashboard, true, &caps), GuardDecision::Allow);
    }

    #[test]
    fn test_unknown_role_only_reaches_dashboard() {
        let caps = capabilities_for(Some("intern"));
        for view in [View::Users, View::Inventory, View::Leads, View::Projects] {
            assert_eq!(
                RouteGuard::resolve(view, true, &caps),
                GuardDecision::RedirectTo(View::Dashboard)
            );
        }
        assert!(RouteGuard::resolve(View::Dashboard, true, &caps).is_allowed());
    }

    #[test]
    fn test_resolve_dashboard_needs_only_a_session() {
        let empty = CapabilitySet::new();
        assert_eq!(RouteGuard::resolve(View::Dashboard, true, &empty), GuardDecision::Allow);
        assert_eq!(
            RouteGuard::resolve(View::Dashboard, false, &empty),
            GuardDecision::RedirectTo(View::Login)
        );

        for view in View::all() {
            let decision = RouteGuard::resolve(*view, true, &empty);
            assert_ne!(decision, GuardDecision::RedirectTo(*view), "{} loops", view);
        }
    }

    #[test]
    fn test_evaluate_without_session() {
        let ctx = context(Arc::new(ManualClock::new(0)));
        let guard = RouteGuard::new();

        assert_eq!(
            guard.evaluate(&ctx, View::Dashboard),
            GuardDecision::RedirectTo(View::Login)
        );
        assert!(guard.evaluate(&ctx, View::Login).is_allowed());
        assert!(guard.menu(&ctx).is_empty());
    }

    #[test]
    fn test_evaluate_sales_admin() {
        let clock = Arc::new(ManualClock::new(0));
        let ctx = context(clock.clone());
        login(&ctx, &clock, "sales_admin");
        let guard = RouteGuard::new();

        assert!(guard.evaluate(&ctx, View::Projects).is_allowed());
        assert_eq!(
            guard.evaluate(&ctx, View::Users),
            GuardDecision::RedirectTo(View::Dashboard)
        );
        assert_eq!(
            guard.menu(&ctx),
            vec![View::Dashboard, View::Inventory, View::Leads, View::Projects]
        );
    }

    #[test]
    fn test_evaluate_after_expiry_redirects_to_login() {
        let clock = Arc::new(ManualClock::new(0));
        let ctx = context(clock.clone());
        login(&ctx, &clock, "admin");
        let guard = RouteGuard::new();
        assert!(guard.evaluate(&ctx, View::Users).is_allowed());

        clock.advance(Duration::from_secs(601));

        assert_eq!(
            guard.evaluate(&ctx, View::Users),
            GuardDecision::RedirectTo(View::Login)
        );
        assert!(ctx.store().load().is_none());
    }
}
