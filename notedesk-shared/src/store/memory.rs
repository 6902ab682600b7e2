/// In-memory stores
///
/// Maps guarded by `tokio::sync::RwLock`. Username uniqueness is checked
/// under the write lock, which gives the same guarantee the `UNIQUE`
/// constraint gives in Postgres. Clones share the same data.

use super::{NoteStore, StoreError, UserStore};
use crate::models::user::{CreateUser, UpdateUser, User, UserProfile};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const USERNAME_CONSTRAINT: &str = "users_username_key";

/// [`UserStore`] kept in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn username_taken(users: &HashMap<Uuid, User>, username: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|u| u.username == username && Some(u.id) != except)
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> Result<Vec<UserProfile>, StoreError> {
        let users = self.users.read().await;
        let mut profiles: Vec<UserProfile> =
            users.values().cloned().map(UserProfile::from).collect();
        profiles.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.username.cmp(&b.username))
        });
        Ok(profiles)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, data: CreateUser) -> Result<User, StoreError> {
        if data.roles.is_empty() {
            return Err(StoreError::Backend("roles must not be empty".to_string()));
        }

        let mut users = self.users.write().await;
        if username_taken(&users, &data.username, None) {
            return Err(StoreError::Duplicate(USERNAME_CONSTRAINT.to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            roles: data.roles,
            active: true,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError> {
        if data.roles.is_empty() {
            return Err(StoreError::Backend("roles must not be empty".to_string()));
        }

        let mut users = self.users.write().await;
        if !users.contains_key(&id) {
            return Ok(None);
        }
        if username_taken(&users, &data.username, Some(id)) {
            return Err(StoreError::Duplicate(USERNAME_CONSTRAINT.to_string()));
        }

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        user.username = data.username;
        user.roles = data.roles;
        user.active = data.active;
        if let Some(password_hash) = data.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// [`NoteStore`] kept in process memory
///
/// Only tracks note ownership, which is all the account manager reads.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNoteStore {
    owners: Arc<RwLock<HashMap<Uuid, Uuid>>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a note owned by `user_id` and returns its ID
    pub async fn add_note(&self, user_id: Uuid) -> Uuid {
        let note_id = Uuid::new_v4();
        self.owners.write().await.insert(note_id, user_id);
        note_id
    }

    /// Removes a note, returning whether it existed
    pub async fn remove_note(&self, note_id: Uuid) -> bool {
        self.owners.write().await.remove(&note_id).is_some()
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn has_notes_for_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.owners.read().await.values().any(|owner| *owner == user_id))
    }
}
