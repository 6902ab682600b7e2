/// User management endpoints
///
/// All four operations share the `/users` path and take their arguments
/// from the JSON body.
///
/// # Endpoints
///
/// - `GET /users` - List users (never includes passwords)
/// - `POST /users` - Create user
/// - `PATCH /users` - Update user
/// - `DELETE /users` - Delete user without notes

use crate::{app::AppState, error::ApiResult, extract::ApiJson};
use axum::{extract::State, http::StatusCode, Json};
use notedesk_shared::{
    accounts::{CreateUserInput, DeleteUserInput, UpdateUserInput},
    models::user::UserProfile,
};
use serde::{Deserialize, Serialize};

/// Confirmation message returned by mutations
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List users
///
/// # Endpoint
///
/// ```text
/// GET /users
/// ```
///
/// # Response
///
/// ```json
/// [
///   {
///     "id": "uuid",
///     "username": "alice",
///     "roles": ["Employee"],
///     "active": true,
///     "created_at": "2025-01-03T12:00:00Z",
///     "updated_at": "2025-01-03T12:00:00Z"
///   }
/// ]
/// ```
///
/// An empty array when there are no users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserProfile>>> {
    let users = state.accounts.list_users().await?;
    Ok(Json(users))
}

/// Create user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "pw123",
///   "roles": ["Employee"]
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "message": "User alice created successfully" }`
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields, malformed body, or the store
///   rejected the insert ("Something went wrong")
/// - `409 Conflict`: Username already exists
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserInput>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let user = state.accounts.create_user(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("User {} created successfully", user.username),
        }),
    ))
}

/// Update user
///
/// # Endpoint
///
/// ```text
/// PATCH /users
/// Content-Type: application/json
///
/// {
///   "id": "uuid",
///   "username": "alice",
///   "password": "optional-new-password",
///   "roles": ["Employee", "Manager"],
///   "active": true
/// }
/// ```
///
/// # Response
///
/// `200 OK` with `{ "message": "User alice updated successfully" }`
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields or `active` not a boolean
/// - `404 Not Found`: Unknown id
/// - `409 Conflict`: Username held by another user
pub async fn update_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateUserInput>,
) -> ApiResult<Json<MessageResponse>> {
    let user = state.accounts.update_user(req).await?;

    Ok(Json(MessageResponse {
        message: format!("User {} updated successfully", user.username),
    }))
}

/// Delete user
///
/// # Endpoint
///
/// ```text
/// DELETE /users
/// Content-Type: application/json
///
/// { "id": "uuid" }
/// ```
///
/// # Response
///
/// `200 OK` with `{ "message": "Username alice with ID <uuid> deleted successfully" }`
///
/// # Errors
///
/// - `400 Bad Request`: Missing id
/// - `409 Conflict`: User has assigned notes
/// - `404 Not Found`: Unknown id
pub async fn delete_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DeleteUserInput>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = state.accounts.delete_user(req).await?;

    Ok(Json(MessageResponse {
        message: format!(
            "Username {} with ID {} deleted successfully",
            deleted.username, deleted.id
        ),
    }))
}
