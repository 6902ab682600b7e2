/// Database models for NoteDesk
///
/// Each model owns its SQL and exposes static CRUD functions taking a
/// `&PgPool`.
///
/// # Models
///
/// - `user`: User accounts, roles and password digests
/// - `note`: Notes, each owned by one user

pub mod note;
pub mod user;
