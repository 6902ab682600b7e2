/// `GET /health`
///
/// Always answers 200. A store that cannot be reached turns the report
/// `degraded` instead of failing the request:
///
/// ```json
/// { "status": "degraded", "version": "0.1.0", "database": "disconnected" }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub database: StoreStatus,
}

impl HealthReport {
    fn from_store(reachable: bool) -> Self {
        let (status, database) = if reachable {
            (ServiceStatus::Healthy, StoreStatus::Connected)
        } else {
            (ServiceStatus::Degraded, StoreStatus::Disconnected)
        };

        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database,
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    let reachable = match state.accounts.check_store().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "User store unreachable");
            false
        }
    };

    Json(HealthReport::from_store(reachable))
}
