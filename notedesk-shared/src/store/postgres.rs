/// Postgres-backed stores
///
/// Thin adapters from the store traits to the model functions. `PgPool` is
/// reference counted, so cloning these is cheap.

use super::{NoteStore, StoreError, UserStore};
use crate::db::pool;
use crate::models::{
    note::Note,
    user::{CreateUser, UpdateUser, User, UserProfile},
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// [`UserStore`] over the `users` table
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<UserProfile>, StoreError> {
        Ok(User::list(&self.pool).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn insert(&self, data: CreateUser) -> Result<User, StoreError> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn update(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError> {
        Ok(User::update(&self.pool, id, data).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(User::delete(&self.pool, id).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(pool::ping(&self.pool).await?)
    }
}

/// [`NoteStore`] over the `notes` table
#[derive(Debug, Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn has_notes_for_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(Note::exists_for_user(&self.pool, user_id).await?)
    }
}
