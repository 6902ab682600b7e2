/// User model and database operations
///
/// Users own notes and carry the roles used by the rest of the system.
/// Passwords are only ever stored as Argon2id digests.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     roles TEXT[] NOT NULL DEFAULT ARRAY['Employee']::TEXT[],
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_username_key UNIQUE (username),
///     CONSTRAINT users_roles_not_empty CHECK (cardinality(roles) > 0)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use notedesk_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "alice".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         roles: vec!["Employee".to_string()],
///     },
/// )
/// .await?;
///
/// let found = User::find_by_username(&pool, "alice").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A user account row, including the password digest
///
/// This type never leaves the server. Anything returned to clients goes
/// through [`UserProfile`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (generated by the database)
    pub id: Uuid,

    /// Login name, unique across all users
    pub username: String,

    /// Argon2id digest in PHC string format
    pub password_hash: String,

    /// Role labels, never empty
    pub roles: Vec<String>,

    /// Whether the account may be used
    pub active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user account
///
/// Has no password field at all, so it is safe to serialize into any
/// response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            roles: user.roles,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Login name
    pub username: String,

    /// Argon2id digest (NOT the plaintext password)
    pub password_hash: String,

    /// Role labels, must not be empty
    pub roles: Vec<String>,
}

/// Input for updating an existing user
///
/// Username, roles and the active flag are always overwritten. The password
/// digest is only replaced when `password_hash` is `Some`.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub password_hash: Option<String>,
}

impl User {
    /// Inserts a new user and returns the stored row
    ///
    /// # Errors
    ///
    /// Returns a database error if the username is taken
    /// (`users_username_key`), the roles are empty or the connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, roles)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, roles, active, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .bind(data.roles)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, roles, active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by exact username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, roles, active, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists every user, oldest first
    ///
    /// The password column is never selected.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserProfile>, sqlx::Error> {
        let users = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, username, roles, active, created_at, updated_at
            FROM users
            ORDER BY created_at ASC, username ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Overwrites username, roles and active flag, and the digest when given
    ///
    /// `COALESCE` keeps the stored digest when no new one is supplied.
    ///
    /// # Returns
    ///
    /// The updated row, or `None` if no user has this ID
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2,
                roles = $3,
                active = $4,
                password_hash = COALESCE($5, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, password_hash, roles, active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.username)
        .bind(data.roles)
        .bind(data.active)
        .bind(data.password_hash)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the user didn't exist
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation (`notes_user_id_fkey`) while any
    /// note still references the user.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
