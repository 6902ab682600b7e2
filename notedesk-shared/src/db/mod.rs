/// Database layer for NoteDesk
///
/// # Modules
///
/// - `pool`: PostgreSQL pool settings, connect and ping
/// - `migrations`: embedded schema migrations
///
/// Models are in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
