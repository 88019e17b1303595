// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authenticated access to the CRM collections behind the gated views.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use rocket_session::SessionContext;

use crate::client::{ApiClient, WriteMethod};
use crate::error::{AuthError, AuthResult};
use crate::guard::View;

// =============================================================================
// Collection
// =============================================================================

/// A CRM collection listed by one of the gated views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Users. The API exposes no list endpoint.
    Users,
    /// Inventory items.
    Inventory,
    /// Leads.
    Leads,
    /// Projects.
    Projects,
}

impl Collection {
    /// Returns the list endpoint, if the API has one.
    pub fn list_path(&self) -> Option<&'static str> {
        match self {
            Collection::Users => None,
            Collection::Inventory => Some("/inventory/get-all"),
            Collection::Leads => Some("/leads/find-leads"),
            Collection::Projects => Some("/projects/all"),
        }
    }

    /// Returns the request performing `mutation`, if the API supports it.
    pub fn write_request(&self, mutation: &Mutation) -> Option<WriteRequest> {
        use WriteMethod::{Delete, Patch, Post};

        let (method, path, body) = match (self, mutation) {
            (Collection::Users, Mutation::Create(body)) => {
                (Post, "/auth/add-user".to_string(), Some(body.clone()))
            }
            (Collection::Users, Mutation::Update { id, changes }) => {
                (Patch, "/auth/update-user".to_string(), Some(with_id(changes, id)))
            }
            (Collection::Users, Mutation::Delete { id }) => {
                (Delete, "/auth/delete-user".to_string(), Some(json!({ "id": id })))
            }

            (Collection::Leads, Mutation::Create(body)) => {
                (Post, "/leads/create-lead".to_string(), Some(body.clone()))
            }
            (Collection::Leads, Mutation::Update { id, changes }) => {
                (Patch, format!("/leads/update-lead/{}", id), Some(changes.clone()))
            }
            (Collection::Leads, Mutation::Delete { .. }) => return None,

            (Collection::Inventory, Mutation::Create(body)) => {
                (Post, "/inventory/create".to_string(), Some(body.clone()))
            }
            (Collection::Inventory, Mutation::Update { id, changes }) => {
                (Patch, format!("/inventory/update/{}", id), Some(changes.clone()))
            }
            (Collection::Inventory, Mutation::Delete { id }) => {
                (Delete, format!("/inventory/delete/{}", id), None)
            }

            (Collection::Projects, Mutation::Create(body)) => {
                (Post, "/projects/create".to_string(), Some(body.clone()))
            }
            (Collection::Projects, Mutation::Update { id, changes }) => {
                (Patch, format!("/projects/update/{}", id), Some(changes.clone()))
            }
            (Collection::Projects, Mutation::Delete { id }) => {
                (Delete, format!("/projects/delete/{}", id), None)
            }
        };

        Some(WriteRequest { method, path, body })
    }

    /// Returns the view that lists this collection.
    pub fn view(&self) -> View {
        match self {
            Collection::Users => View::Users,
            Collection::Inventory => View::Inventory,
            Collection::Leads => View::Leads,
            Collection::Projects => View::Projects,
        }
    }

    /// Returns the collection listed by `view`.
    pub fn for_view(view: View) -> Option<Self> {
        match view {
            View::Users => Some(Collection::Users),
            View::Inventory => Some(Collection::Inventory),
            View::Leads => Some(Collection::Leads),
            View::Projects => Some(Collection::Projects),
            View::Login | View::Dashboard => None,
        }
    }

    /// Returns the collection name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Inventory => "inventory",
            Collection::Leads => "leads",
            Collection::Projects => "projects",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Mutation
// =============================================================================

/// A write against one collection item.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Add an item.
    Create(Value),
    /// Change fields of an existing item.
    Update {
        /// Item id.
        id: String,
        /// Fields to change.
        changes: Value,
    },
    /// Remove an item.
    Delete {
        /// Item id.
        id: String,
    },
}

impl Mutation {
    /// Returns the operation name.
    pub fn operation(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "create",
            Mutation::Update { .. } => "update",
            Mutation::Delete { .. } => "delete",
        }
    }
}

/// An authenticated write request.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    /// HTTP method.
    pub method: WriteMethod,
    /// Request path.
    pub path: String,
    /// JSON body.
    pub body: Option<Value>,
}

/// Outcome of a write and the reload that follows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationOutcome {
    /// Collection written to.
    pub collection: Collection,
    /// Operation performed.
    pub operation: &'static str,
    /// Body returned by the write.
    pub response: Value,
    /// Items after the reload.
    pub items: Vec<Value>,
}

/// Merges `id` into an object body, or wraps it when the body is not an object.
fn with_id(changes: &Value, id: &str) -> Value {
    match changes {
        Value::Object(map) => {
            let mut map = map.clone();
            map.entry("id").or_insert_with(|| Value::String(id.to_string()));
            Value::Object(map)
        }
        _ => json!({ "id": id }),
    }
}

// =============================================================================
// DashboardSummary
// =============================================================================

/// Item counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Number of projects.
    pub projects: usize,
    /// Number of leads.
    pub leads: usize,
    /// Number of inventory items.
    pub inventory: usize,
}

// =============================================================================
// ResourceClient
// =============================================================================

/// Lists collections with the current session's token.
///
/// A 401 from the API ends the session through
/// [`SessionContext::handle_unauthorized`] and surfaces as
/// [`AuthError::Unauthorized`]. Every other failure degrades to an empty
/// list.
pub struct ResourceClient {
    api: Arc<dyn ApiClient>,
    context: Arc<SessionContext>,
}

impl ResourceClient {
    /// Creates a resource client.
    pub fn new(api: Arc<dyn ApiClient>, context: Arc<SessionContext>) -> Self {
        Self { api, context }
    }

    /// Lists the items of `collection`.
    pub async fn list(&self, collection: Collection) -> AuthResult<Vec<Value>> {
        let Some(path) = collection.list_path() else {
            return Ok(Vec::new());
        };

        let Some(token) = self.context.token() else {
            self.context.handle_unauthorized();
            return Err(AuthError::Unauthorized);
        };

        match self.api.get_json(path, &token).await {
            Ok(body) => {
                let items = extract_items(body);
                debug!(collection = %collection, count = items.len(), "Collection listed");
                Ok(items)
            }
            Err(AuthError::Unauthorized) => {
                self.context.handle_unauthorized();
                Err(AuthError::Unauthorized)
            }
            Err(e) => {
                warn!(
                    collection = %collection,
                    error_type = e.error_type(),
                    error = %e,
                    "Failed to list collection"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Writes to `collection`, then reloads it.
    ///
    /// Write failures are returned rather than degraded. A 401 ends the
    /// session. A failing reload yields an empty item list.
    pub async fn apply(
        &self,
        collection: Collection,
        mutation: Mutation,
    ) -> AuthResult<MutationOutcome> {
        let operation = mutation.operation();
        let request = collection
            .write_request(&mutation)
            .ok_or_else(|| AuthError::unsupported(collection.as_str(), operation))?;

        let Some(token) = self.context.token() else {
            self.context.handle_unauthorized();
            return Err(AuthError::Unauthorized);
        };

        let response = match self
            .api
            .send_json(request.method, &request.path, &token, request.body.as_ref())
            .await
        {
            Ok(body) => body,
            Err(AuthError::Unauthorized) => {
                self.context.handle_unauthorized();
                return Err(AuthError::Unauthorized);
            }
            Err(e) => {
                warn!(
                    collection = %collection,
                    operation,
                    error_type = e.error_type(),
                    error = %e,
                    "Write rejected"
                );
                return Err(e);
            }
        };

        info!(
            collection = %collection,
            operation,
            method = %request.method,
            path = %request.path,
            "Collection updated"
        );

        let items = self.list(collection).await?;
        Ok(MutationOutcome {
            collection,
            operation,
            response,
            items,
        })
    }

    /// Counts projects, leads and inventory.
    ///
    /// Each count falls back to zero on its own failure. An unauthorized
    /// response aborts the summary.
    pub async fn summary(&self) -> AuthResult<DashboardSummary> {
        let projects = self.list(Collection::Projects).await?.len();
        let leads = self.list(Collection::Leads).await?.len();
        let inventory = self.list(Collection::Inventory).await?.len();

        Ok(DashboardSummary {
            projects,
            leads,
            inventory,
        })
    }
}

impl fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("api", &self.api.name())
            .finish_non_exhaustive()
    }
}

/// Accepts a bare array or an object wrapping it under `data`.
fn extract_items(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use rocket_core::{Clock, LegacySessionPolicy, ManualClock, SessionRecord, UserProfile};
    use rocket_session::{MemoryStorage, SessionStore, SessionValidator};
    use serde_json::json;

    use crate::client::{Credentials, LoginResponse};

    type Responses = HashMap<&'static str, fn() -> AuthResult<Value>>;

    struct ScriptedApi {
        responses: Responses,
        writes: Writes,
    }

    type Writes = Arc<parking_lot::Mutex<Vec<(String, String, Option<Value>)>>>;

    #[async_trait]
    impl ApiClient for ScriptedApi {
        async fn login(&self, _credentials: &Credentials) -> AuthResult<LoginResponse> {
            Err(AuthError::rejected(None))
        }

        async fn get_json(&self, path: &str, _token: &str) -> AuthResult<Value> {
            match self.responses.get(path) {
                Some(respond) => respond(),
                None => Err(AuthError::invalid_response(path, "status 404 Not Found")),
            }
        }

        async fn send_json(
            &self,
            _method: WriteMethod,
            path: &str,
            token: &str,
            body: Option<&Value>,
        ) -> AuthResult<Value> {
            self.writes
                .lock()
                .push((path.to_string(), token.to_string(), body.cloned()));
            self.get_json(path, token).await
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn logged_in_client(responses: Responses) -> (Arc<SessionContext>, ResourceClient) {
        let (ctx, client, _) = recording_client(responses);
        (ctx, client)
    }

    fn recording_client(responses: Responses) -> (Arc<SessionContext>, ResourceClient, Writes) {
        let clock = Arc::new(ManualClock::new(0));
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let ctx = Arc::new(SessionContext::new(
            store,
            SessionValidator::new(clock.clone(), LegacySessionPolicy::Accept),
        ));
        let user = UserProfile::new("1").with_role("admin");
        ctx.establish(SessionRecord::issue(
            user,
            "T",
            clock.now_millis(),
            Duration::from_secs(60),
        ))
        .unwrap();

        let writes = Writes::default();
        let api = ScriptedApi {
            responses,
            writes: writes.clone(),
        };
        let client = ResourceClient::new(Arc::new(api), ctx.clone());
        (ctx, client, writes)
    }

    #[test]
    fn test_extract_items() {
        assert_eq!(extract_items(json!([1, 2])).len(), 2);
        assert_eq!(extract_items(json!({"data": [1, 2, 3]})).len(), 3);
        assert!(extract_items(json!({"items": [1]})).is_empty());
        assert!(extract_items(json!("nope")).is_empty());
    }

    #[test]
    fn test_collection_views() {
        assert_eq!(Collection::for_view(View::Leads), Some(Collection::Leads));
        assert_eq!(Collection::for_view(View::Dashboard), None);
        assert_eq!(Collection::Users.list_path(), None);
        assert_eq!(Collection::Projects.view(), View::Projects);
    }

    #[tokio::test]
    async fn test_summary_counts_with_partial_failure() {
        let mut responses: Responses = HashMap::new();
        responses.insert("/projects/all", || Ok(json!([{"id": 1}, {"id": 2}])));
        responses.insert("/leads/find-leads", || Err(AuthError::network("timeout")));
        responses.insert("/inventory/get-all", || Ok(json!({"data": [{"id": 1}]})));

        let (_, client) = logged_in_client(responses);
        let summary = client.summary().await.unwrap();

        assert_eq!(
            summary,
            DashboardSummary {
                projects: 2,
                leads: 0,
                inventory: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_users_list_is_empty() {
        let (_, client) = logged_in_client(HashMap::new());
        assert!(client.list(Collection::Users).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_ends_session() {
        let mut responses: Responses = HashMap::new();
        responses.insert("/leads/find-leads", || Err(AuthError::Unauthorized));

        let (ctx, client) = logged_in_client(responses);
        let err = client.list(Collection::Leads).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!ctx.is_logged_in());
        assert!(ctx.store().load().is_none());
    }

    #[test]
    fn test_write_requests() {
        let update = Mutation::Update {
            id: "9".to_string(),
            changes: json!({"status": "won"}),
        };
        let delete = Mutation::Delete { id: "4".to_string() };

        let request = Collection::Leads.write_request(&update).unwrap();
        assert_eq!(request.method, WriteMethod::Patch);
        assert_eq!(request.path, "/leads/update-lead/9");
        assert_eq!(request.body, Some(json!({"status": "won"})));

        let request = Collection::Inventory.write_request(&delete).unwrap();
        assert_eq!(request.method, WriteMethod::Delete);
        assert_eq!(request.path, "/inventory/delete/4");
        assert_eq!(request.body, None);

        let request = Collection::Users.write_request(&update).unwrap();
        assert_eq!(request.path, "/auth/update-user");
        assert_eq!(request.body, Some(json!({"status": "won", "id": "9"})));

        let request = Collection::Users.write_request(&delete).unwrap();
        assert_eq!(request.body, Some(json!({"id": "4"})));

        let request = Collection::Projects
            .write_request(&Mutation::Create(json!({"name": "Tower"})))
            .unwrap();
        assert_eq!(request.method, WriteMethod::Post);
        assert_eq!(request.path, "/projects/create");

        assert!(Collection::Leads.write_request(&delete).is_none());
    }

    #[tokio::test]
    async fn test_apply_writes_then_reloads() {
        let mut responses: Responses = HashMap::new();
        responses.insert("/inventory/create", || Ok(json!({"id": 5})));
        responses.insert("/inventory/get-all", || Ok(json!([{"id": 1}, {"id": 5}])));

        let (_, client, writes) = recording_client(responses);
        let outcome = client
            .apply(Collection::Inventory, Mutation::Create(json!({"unit": "A-12"})))
            .await
            .unwrap();

        assert_eq!(outcome.operation, "create");
        assert_eq!(outcome.response, json!({"id": 5}));
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(
            writes.lock().clone(),
            vec![(
                "/inventory/create".to_string(),
                "T".to_string(),
                Some(json!({"unit": "A-12"}))
            )]
        );
    }

    #[tokio::test]
    async fn test_apply_unauthorized_ends_session() {
        let mut responses: Responses = HashMap::new();
        responses.insert("/projects/delete/3", || Err(AuthError::Unauthorized));

        let (ctx, client) = logged_in_client(responses);
        let err = client
            .apply(Collection::Projects, Mutation::Delete { id: "3".to_string() })
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!ctx.is_logged_in());
    }

    #[tokio::test]
    async fn test_apply_failure_is_returned() {
        let mut responses: Responses = HashMap::new();
        responses.insert("/leads/create-lead", || {
            Err(AuthError::invalid_response("/leads/create-lead", "Phone is required"))
        });

        let (ctx, client) = logged_in_client(responses);
        let err = client
            .apply(Collection::Leads, Mutation::Create(json!({})))
            .await
            .unwrap_err();

        assert_eq!(err.error_type(), "invalid_response");
        assert!(ctx.is_logged_in());
    }

    #[tokio::test]
    async fn test_apply_unsupported_sends_nothing() {
        let (ctx, client, writes) = recording_client(HashMap::new());
        let err = client
            .apply(Collection::Leads, Mutation::Delete { id: "1".to_string() })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Unsupported { .. }));
        assert!(writes.lock().is_empty());
        assert!(ctx.is_logged_in());
    }
}
