/// Note model and database operations
///
/// Every note belongs to exactly one user. The account manager only reads
/// this table, to refuse deleting users who still own notes; the
/// `ON DELETE RESTRICT` foreign key backs that check up.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users (id) ON DELETE RESTRICT,
///     title VARCHAR(255) NOT NULL,
///     text TEXT NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A note owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    pub title: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a note
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
}

impl Note {
    /// Inserts a note for an existing user
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if `user_id` does not exist.
    pub async fn create(pool: &PgPool, data: CreateNote) -> Result<Self, sqlx::Error> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (user_id, title, text)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, text, completed, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.text)
        .fetch_one(pool)
        .await?;

        Ok(note)
    }

    /// Deletes a note by ID, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns true if at least one note references the user
    pub async fn exists_for_user(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM notes WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }
}
