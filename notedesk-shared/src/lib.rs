//! # NoteDesk Shared Library
//!
//! Domain types and business logic for NoteDesk user accounts, used by the
//! API server.
//!
//! ## Module Organization
//!
//! - `accounts`: the user account manager (list, create, update, delete)
//! - `auth`: password hashing capability
//! - `db`: connection pool and migrations
//! - `models`: database models and their SQL
//! - `store`: store interfaces with Postgres and in-memory implementations

pub mod accounts;
pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the NoteDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
