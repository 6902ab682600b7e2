/// API route handlers
///
/// - `health`: Health check endpoint
/// - `users`: User management endpoints (list, create, update, delete)

pub mod health;
pub mod users;
