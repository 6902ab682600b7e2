/// User account management
///
/// [`AccountManager`] implements the list / create / update / delete
/// lifecycle of user accounts on top of the injected [`UserStore`],
/// [`NoteStore`] and [`CredentialHasher`].
///
/// Every check returns as soon as it fails: invalid input never reaches the
/// store, and a conflict or a missing user stops the operation before any
/// write happens.
///
/// The username pre-checks only exist to produce a clear conflict message.
/// Two concurrent requests can both pass them; the store's uniqueness
/// constraint decides, and its `Duplicate` error is reported as the same
/// conflict.
///
/// # Example
///
/// ```
/// use notedesk_shared::accounts::{AccountManager, CreateUserInput};
/// use notedesk_shared::auth::password::{Argon2Hasher, HashParams};
/// use notedesk_shared::store::{InMemoryNoteStore, InMemoryUserStore};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), notedesk_shared::accounts::AccountError> {
/// let accounts = AccountManager::new(
///     Arc::new(InMemoryUserStore::new()),
///     Arc::new(InMemoryNoteStore::new()),
///     Arc::new(Argon2Hasher::new(HashParams::default())),
/// );
///
/// let user = accounts
///     .create_user(CreateUserInput {
///         username: Some("alice".to_string()),
///         password: Some("pw123".to_string()),
///         roles: Some(vec!["Employee".to_string()]),
///     })
///     .await?;
/// assert_eq!(user.username, "alice");
/// # Ok(())
/// # }
/// ```

use crate::auth::password::{CredentialHasher, PasswordError};
use crate::models::user::{CreateUser, UpdateUser, UserProfile};
use crate::store::{NoteStore, StoreError, UserStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

pub const MSG_CREATE_FIELDS: &str = "Please provide username, password and role(s)";
pub const MSG_UPDATE_FIELDS: &str = "All fields are required";
pub const MSG_DELETE_FIELDS: &str = "Please provide user id";
pub const MSG_DUPLICATE_USERNAME: &str = "Username already exists";
pub const MSG_USER_NOT_FOUND: &str = "User not found";
pub const MSG_USER_HAS_NOTES: &str = "User has assigned notes";
pub const MSG_CREATE_FAILED: &str = "Something went wrong";

/// Errors returned by account operations
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Missing or malformed input; `fields` names the offending fields
    #[error("{message}")]
    Validation { message: String, fields: Vec<String> },

    /// Username taken, or user still owns notes
    #[error("{0}")]
    Conflict(String),

    /// No user with the requested ID
    #[error("{0}")]
    NotFound(String),

    /// The store rejected a new account for an unexpected reason
    #[error("Something went wrong")]
    CreateFailed(#[source] StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl AccountError {
    fn validation(message: &str, errors: Option<&ValidationErrors>) -> Self {
        let mut fields: Vec<String> = errors
            .map(|e| e.field_errors().keys().map(|k| k.to_string()).collect())
            .unwrap_or_default();
        fields.sort();

        AccountError::Validation {
            message: message.to_string(),
            fields,
        }
    }
}

/// Body of a create request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(required, length(min = 1, max = 255))]
    pub username: Option<String>,

    #[validate(required, length(min = 1))]
    pub password: Option<String>,

    #[validate(required, length(min = 1))]
    pub roles: Option<Vec<String>>,
}

/// Body of an update request
///
/// `password` is optional; `None` or an empty string keeps the stored digest.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(required)]
    pub id: Option<Uuid>,

    #[validate(required, length(min = 1, max = 255))]
    pub username: Option<String>,

    pub password: Option<String>,

    #[validate(required, length(min = 1))]
    pub roles: Option<Vec<String>>,

    #[validate(required)]
    pub active: Option<bool>,
}

/// Body of a delete request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DeleteUserInput {
    #[validate(required)]
    pub id: Option<Uuid>,
}

/// Identity of a removed account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedUser {
    pub id: Uuid,
    pub username: String,
}

/// Removes duplicate labels, keeping first occurrences in order.
/// Returns `None` if any label is blank.
fn normalize_roles(roles: Vec<String>) -> Option<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(roles.len());
    for role in roles {
        if role.trim().is_empty() {
            return None;
        }
        if !out.contains(&role) {
            out.push(role);
        }
    }
    Some(out)
}

/// The user account manager
pub struct AccountManager {
    users: Arc<dyn UserStore>,
    notes: Arc<dyn NoteStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountManager {
    pub fn new(
        users: Arc<dyn UserStore>,
        notes: Arc<dyn NoteStore>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            users,
            notes,
            hasher,
        }
    }

    /// Lists every account, without password digests
    ///
    /// Returns an empty vector when there are no accounts.
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, AccountError> {
        let users = self.users.list().await?;
        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Creates an account
    ///
    /// # Errors
    ///
    /// - `Validation` if username, password or roles are missing or empty
    /// - `Conflict` if the username is taken
    /// - `CreateFailed` if the store rejects the insert for another reason
    pub async fn create_user(&self, input: CreateUserInput) -> Result<UserProfile, AccountError> {
        input
            .validate()
            .map_err(|e| AccountError::validation(MSG_CREATE_FIELDS, Some(&e)))?;

        let (Some(username), Some(password), Some(roles)) =
            (input.username, input.password, input.roles)
        else {
            return Err(AccountError::validation(MSG_CREATE_FIELDS, None));
        };
        let roles = normalize_roles(roles).ok_or_else(|| AccountError::Validation {
            message: MSG_CREATE_FIELDS.to_string(),
            fields: vec!["roles".to_string()],
        })?;

        if self.users.find_by_username(&username).await?.is_some() {
            warn!(username = %username, "Rejected create: username already exists");
            return Err(AccountError::Conflict(MSG_DUPLICATE_USERNAME.to_string()));
        }

        let password_hash = self.hasher.hash(&password)?;

        let user = self
            .users
            .insert(CreateUser {
                username,
                password_hash,
                roles,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => {
                    AccountError::Conflict(MSG_DUPLICATE_USERNAME.to_string())
                }
                other => AccountError::CreateFailed(other),
            })?;

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user.into())
    }

    /// Updates an account
    ///
    /// Username, roles and the active flag are replaced. The password is
    /// rehashed only when a non-empty one is supplied.
    ///
    /// # Errors
    ///
    /// - `Validation` if id, username, roles or active is missing or empty
    /// - `NotFound` if no account has this ID
    /// - `Conflict` if another account holds the username
    pub async fn update_user(&self, input: UpdateUserInput) -> Result<UserProfile, AccountError> {
        input
            .validate()
            .map_err(|e| AccountError::validation(MSG_UPDATE_FIELDS, Some(&e)))?;

        let (Some(id), Some(username), Some(roles), Some(active)) =
            (input.id, input.username, input.roles, input.active)
        else {
            return Err(AccountError::validation(MSG_UPDATE_FIELDS, None));
        };
        let roles = normalize_roles(roles).ok_or_else(|| AccountError::Validation {
            message: MSG_UPDATE_FIELDS.to_string(),
            fields: vec!["roles".to_string()],
        })?;

        if self.users.find_by_id(id).await?.is_none() {
            return Err(AccountError::NotFound(MSG_USER_NOT_FOUND.to_string()));
        }

        if let Some(holder) = self.users.find_by_username(&username).await? {
            if holder.id != id {
                warn!(user_id = %id, username = %username, "Rejected update: username already exists");
                return Err(AccountError::Conflict(MSG_DUPLICATE_USERNAME.to_string()));
            }
        }

        let password_hash = match input.password.as_deref() {
            Some(password) if !password.is_empty() => Some(self.hasher.hash(password)?),
            _ => None,
        };
        let rehashed = password_hash.is_some();

        let user = self
            .users
            .update(
                id,
                UpdateUser {
                    username,
                    roles,
                    active,
                    password_hash,
                },
            )
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => {
                    AccountError::Conflict(MSG_DUPLICATE_USERNAME.to_string())
                }
                other => AccountError::Store(other),
            })?
            .ok_or_else(|| AccountError::NotFound(MSG_USER_NOT_FOUND.to_string()))?;

        info!(user_id = %user.id, username = %user.username, rehashed, "User updated");
        Ok(user.into())
    }

    /// Deletes an account that owns no notes
    ///
    /// # Errors
    ///
    /// - `Validation` if the id is missing
    /// - `Conflict` if any note references the account
    /// - `NotFound` if no account has this ID
    pub async fn delete_user(&self, input: DeleteUserInput) -> Result<DeletedUser, AccountError> {
        input
            .validate()
            .map_err(|e| AccountError::validation(MSG_DELETE_FIELDS, Some(&e)))?;
        let id = input
            .id
            .ok_or_else(|| AccountError::validation(MSG_DELETE_FIELDS, None))?;

        if self.notes.has_notes_for_user(id).await? {
            warn!(user_id = %id, "Rejected delete: user has assigned notes");
            return Err(AccountError::Conflict(MSG_USER_HAS_NOTES.to_string()));
        }

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AccountError::NotFound(MSG_USER_NOT_FOUND.to_string()))?;

        // The foreign key catches notes created after the check above.
        let deleted = self.users.delete(id).await.map_err(|e| match e {
            StoreError::Referenced(_) => AccountError::Conflict(MSG_USER_HAS_NOTES.to_string()),
            other => AccountError::Store(other),
        })?;
        if !deleted {
            return Err(AccountError::NotFound(MSG_USER_NOT_FOUND.to_string()));
        }

        info!(user_id = %user.id, username = %user.username, "User deleted");
        Ok(DeletedUser {
            id: user.id,
            username: user.username,
        })
    }

    /// Checks that the user store is reachable
    pub async fn check_store(&self) -> Result<(), AccountError> {
        Ok(self.users.ping().await?)
    }
}
