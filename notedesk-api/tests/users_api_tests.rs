/// HTTP tests for the `/users` endpoints
///
/// Each test drives the real router through `tower::ServiceExt::oneshot`
/// against in-memory stores.

mod common;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::StatusCode;
use common::TestContext;
use notedesk_shared::models::user::{CreateUser, UpdateUser, User, UserProfile};
use notedesk_shared::store::{InMemoryNoteStore, StoreError, UserStore};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Empty user store whose writes fail with a non-constraint error
struct UnavailableUserStore;

#[async_trait]
impl UserStore for UnavailableUserStore {
    async fn list(&self) -> Result<Vec<UserProfile>, StoreError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn insert(&self, _data: CreateUser) -> Result<User, StoreError> {
        Err(StoreError::Backend("connection reset by peer".to_string()))
    }

    async fn update(&self, _id: Uuid, _data: UpdateUser) -> Result<Option<User>, StoreError> {
        Err(StoreError::Backend("connection reset by peer".to_string()))
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(StoreError::Backend("connection reset by peer".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection reset by peer".to_string()))
    }
}

#[tokio::test]
async fn test_list_users_empty() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send("GET", "/users", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_users_omits_password() {
    let ctx = TestContext::new();
    ctx.create_user("alice", &["Employee"]).await;
    ctx.create_user("bob", &["Manager", "Admin"]).await;

    let (status, body) = ctx.send("GET", "/users", None).await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        let fields = user.as_object().unwrap();
        assert!(!fields.contains_key("password"));
        assert!(!fields.contains_key("password_hash"));
        assert_eq!(user["active"], json!(true));
    }
}

#[tokio::test]
async fn test_create_user() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/users",
            Some(json!({
                "username": "alice",
                "password": "pw123",
                "roles": ["Employee"]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User alice created successfully");
    assert_eq!(ctx.users.len().await, 1);
}

#[tokio::test]
async fn test_create_user_duplicate_username() {
    let ctx = TestContext::new();
    ctx.create_user("alice", &["Employee"]).await;

    let (status, body) = ctx
        .send(
            "POST",
            "/users",
            Some(json!({
                "username": "alice",
                "password": "other",
                "roles": ["Manager"]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists");
    assert_eq!(ctx.users.len().await, 1);
}

#[tokio::test]
async fn test_create_user_missing_fields() {
    let ctx = TestContext::new();

    let bodies = [
        json!({ "password": "pw123", "roles": ["Employee"] }),
        json!({ "username": "alice", "roles": ["Employee"] }),
        json!({ "username": "alice", "password": "pw123" }),
        json!({ "username": "alice", "password": "pw123", "roles": [] }),
        json!({ "username": "", "password": "pw123", "roles": ["Employee"] }),
    ];

    for body in bodies {
        let (status, response) = ctx.send("POST", "/users", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(
            response["message"], "Please provide username, password and role(s)",
            "body: {}",
            body
        );
    }

    assert!(ctx.users.is_empty().await);
}

#[tokio::test]
async fn test_create_user_roles_not_array() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/users",
            Some(json!({
                "username": "alice",
                "password": "pw123",
                "roles": "Employee"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(ctx.users.is_empty().await);
}

#[tokio::test]
async fn test_create_user_malformed_json() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send_raw("POST", "/users", Body::from("{\"username\": "))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_update_user() {
    let ctx = TestContext::new();
    let id = ctx.create_user("alice", &["Employee"]).await;

    let (status, body) = ctx
        .send(
            "PATCH",
            "/users",
            Some(json!({
                "id": id,
                "username": "alice2",
                "roles": ["Manager"],
                "active": false
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User alice2 updated successfully");

    let (_, listing) = ctx.send("GET", "/users", None).await;
    let user = &listing.as_array().unwrap()[0];
    assert_eq!(user["username"], "alice2");
    assert_eq!(user["roles"], json!(["Manager"]));
    assert_eq!(user["active"], json!(false));
}

#[tokio::test]
async fn test_update_user_keeps_own_username() {
    let ctx = TestContext::new();
    let id = ctx.create_user("alice", &["Employee"]).await;

    let (status, body) = ctx
        .send(
            "PATCH",
            "/users",
            Some(json!({
                "id": id,
                "username": "alice",
                "password": "new-password",
                "roles": ["Employee", "Admin"],
                "active": true
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User alice updated successfully");
}

#[tokio::test]
async fn test_update_user_username_taken() {
    let ctx = TestContext::new();
    ctx.create_user("alice", &["Employee"]).await;
    let bob = ctx.create_user("bob", &["Employee"]).await;

    let (status, body) = ctx
        .send(
            "PATCH",
            "/users",
            Some(json!({
                "id": bob,
                "username": "alice",
                "roles": ["Employee"],
                "active": true
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists");
    assert_eq!(ctx.user_id("bob").await, bob);
}

#[tokio::test]
async fn test_update_user_not_found() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "PATCH",
            "/users",
            Some(json!({
                "id": Uuid::new_v4(),
                "username": "ghost",
                "roles": ["Employee"],
                "active": true
            })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_update_user_missing_fields() {
    let ctx = TestContext::new();
    let id = ctx.create_user("alice", &["Employee"]).await;

    let bodies = [
        json!({ "username": "alice", "roles": ["Employee"], "active": true }),
        json!({ "id": id, "roles": ["Employee"], "active": true }),
        json!({ "id": id, "username": "alice", "active": true }),
        json!({ "id": id, "username": "alice", "roles": [], "active": true }),
        json!({ "id": id, "username": "alice", "roles": ["Employee"] }),
    ];

    for body in bodies {
        let (status, response) = ctx.send("PATCH", "/users", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response["message"], "All fields are required", "body: {}", body);
    }
}

#[tokio::test]
async fn test_update_user_active_not_boolean() {
    let ctx = TestContext::new();
    let id = ctx.create_user("alice", &["Employee"]).await;

    let (status, body) = ctx
        .send(
            "PATCH",
            "/users",
            Some(json!({
                "id": id,
                "username": "alice",
                "roles": ["Employee"],
                "active": "yes"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_delete_user() {
    let ctx = TestContext::new();
    let id = ctx.create_user("alice", &["Employee"]).await;

    let (status, body) = ctx
        .send("DELETE", "/users", Some(json!({ "id": id })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Username alice with ID {} deleted successfully", id)
    );
    assert!(ctx.users.is_empty().await);

    let (status, body) = ctx
        .send("DELETE", "/users", Some(json!({ "id": id })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_delete_user_with_notes() {
    let ctx = TestContext::new();
    let id = ctx.create_user("alice", &["Employee"]).await;
    let note_id = ctx.notes.add_note(id.parse().unwrap()).await;

    let (status, body) = ctx
        .send("DELETE", "/users", Some(json!({ "id": id })))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User has assigned notes");
    assert_eq!(ctx.users.len().await, 1);

    // Once the note is gone the account can be removed
    assert!(ctx.notes.remove_note(note_id).await);
    let (status, _) = ctx
        .send("DELETE", "/users", Some(json!({ "id": id })))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_user_missing_id() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send("DELETE", "/users", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide user id");
}

#[tokio::test]
async fn test_create_user_store_failure_is_generic() {
    let app = common::app_with(
        Arc::new(UnavailableUserStore),
        Arc::new(InMemoryNoteStore::new()),
    );
    let body = json!({
        "username": "alice",
        "password": "pw123",
        "roles": ["Employee"]
    });

    let (status, body) = common::send(&app, "POST", "/users", Body::from(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Something went wrong");
}

#[tokio::test]
async fn test_create_user_username_too_long() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/users",
            Some(json!({
                "username": "x".repeat(256),
                "password": "pw123",
                "roles": ["Employee"]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "username");
    assert!(ctx.users.is_empty().await);
}

#[tokio::test]
async fn test_health_check_degraded() {
    let app = common::app_with(
        Arc::new(UnavailableUserStore),
        Arc::new(InMemoryNoteStore::new()),
    );

    let (status, body) = common::send(&app, "GET", "/health", Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
