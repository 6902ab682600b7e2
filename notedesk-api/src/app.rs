/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use notedesk_api::{app::{build_router, AppState}, config::Config};
/// use notedesk_shared::accounts::AccountManager;
/// use notedesk_shared::auth::password::Argon2Hasher;
/// use notedesk_shared::store::{PgNoteStore, PgUserStore};
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let accounts = AccountManager::new(
///     Arc::new(PgUserStore::new(pool.clone())),
///     Arc::new(PgNoteStore::new(pool)),
///     Arc::new(Argon2Hasher::new(config.password)),
/// );
/// let app = build_router(AppState::new(accounts, config));
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use notedesk_shared::accounts::AccountManager;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// User account manager
    pub accounts: Arc<AccountManager>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(accounts: AccountManager, config: Config) -> Self {
        Self {
            accounts: Arc::new(accounts),
            config: Arc::new(config),
        }
    }
}

/// Builds the CORS layer from the configured origins
///
/// `*` anywhere in the list means any origin is allowed.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health    # Health check
/// └── /users            # User management
///     ├── GET           # List users
///     ├── POST          # Create user
///     ├── PATCH         # Update user
///     └── DELETE        # Delete user
/// ```
///
/// Callers are authenticated upstream of this service.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let cors = cors_layer(&state.config.api.cors_origins);
    let security = SecurityHeadersLayer::new(state.config.api.production);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/users",
            get(routes::users::list_users)
                .post(routes::users::create_user)
                .patch(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(security)
        .with_state(state)
}
