/// Persistence interfaces used by the account manager
///
/// The account manager talks to storage only through [`UserStore`] and
/// [`NoteStore`], so handlers can run against Postgres in production and
/// against in-memory maps in tests.
///
/// # Implementations
///
/// - [`postgres`]: `PgUserStore` / `PgNoteStore`, backed by the models
/// - [`memory`]: `InMemoryUserStore` / `InMemoryNoteStore`

pub mod memory;
pub mod postgres;

use crate::models::user::{CreateUser, UpdateUser, User, UserProfile};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::{InMemoryNoteStore, InMemoryUserStore};
pub use postgres::{PgNoteStore, PgUserStore};

/// Errors reported by a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    /// The row is still referenced by another row
    #[error("Row is still referenced: {0}")]
    Referenced(String),

    /// Any other storage failure
    #[error("Storage error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    return StoreError::Duplicate(constraint)
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    return StoreError::Referenced(constraint)
                }
                _ => {}
            }
        }

        StoreError::Backend(err.to_string())
    }
}

/// Access to the user collection
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users without password digests
    async fn list(&self) -> Result<Vec<UserProfile>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a user, failing with [`StoreError::Duplicate`] on a taken username
    async fn insert(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Applies an update, returning `None` when the ID is unknown
    async fn update(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError>;

    /// Removes a user, returning whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Checks that the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Read access to the note collection
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Returns true if any note is owned by the user
    async fn has_notes_for_user(&self, user_id: Uuid) -> Result<bool, StoreError>;
}
