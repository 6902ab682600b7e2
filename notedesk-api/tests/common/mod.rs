/// Common test utilities for integration tests
///
/// Builds the full router over in-memory stores and a low-cost hasher,
/// so the HTTP tests run without PostgreSQL.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use notedesk_api::app::{build_router, AppState};
use notedesk_api::config::Config;
use notedesk_shared::accounts::AccountManager;
use notedesk_shared::auth::password::{Argon2Hasher, HashParams};
use notedesk_shared::store::{InMemoryNoteStore, InMemoryUserStore, NoteStore, UserStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Router over the given stores with a low-cost hasher and default config
pub fn app_with(users: Arc<dyn UserStore>, notes: Arc<dyn NoteStore>) -> axum::Router {
    let hasher = Argon2Hasher::new(HashParams {
        memory_kib: 4096,
        iterations: 1,
        parallelism: 1,
    });

    let accounts = AccountManager::new(users, notes, Arc::new(hasher));
    build_router(AppState::new(accounts, Config::default()))
}

/// Sends a JSON request to `app` and returns status and parsed body
pub async fn send(app: &axum::Router, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "Expected JSON body, got {}: {}",
                status,
                String::from_utf8_lossy(&bytes)
            )
        })
    };

    (status, json)
}

/// Test context holding the router and handles to its stores
pub struct TestContext {
    pub app: axum::Router,
    pub users: InMemoryUserStore,
    pub notes: InMemoryNoteStore,
}

impl TestContext {
    pub fn new() -> Self {
        let users = InMemoryUserStore::new();
        let notes = InMemoryNoteStore::new();
        let app = app_with(Arc::new(users.clone()), Arc::new(notes.clone()));

        Self { app, users, notes }
    }

    /// Sends a request with an optional JSON body and returns status and parsed body
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        };
        self.send_raw(method, uri, body).await
    }

    /// Sends a request with a raw JSON body
    pub async fn send_raw(&self, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
        send(&self.app, method, uri, body).await
    }

    /// Creates a user through the API and returns its ID from the listing
    pub async fn create_user(&self, username: &str, roles: &[&str]) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/users",
                Some(serde_json::json!({
                    "username": username,
                    "password": "pw123",
                    "roles": roles,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);

        self.user_id(username).await
    }

    /// Looks up a user's ID via `GET /users`
    pub async fn user_id(&self, username: &str) -> String {
        let (_, body) = self.send("GET", "/users", None).await;
        body.as_array()
            .unwrap()
            .iter()
            .find(|u| u["username"] == username)
            .and_then(|u| u["id"].as_str())
            .map(str::to_string)
            .unwrap_or_else(|| panic!("user {} not listed", username))
    }
}
