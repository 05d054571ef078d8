//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::state::AppState;

/// Reachability of the configured database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Up,
    Down,
    Disabled,
}

impl DatabaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DatabaseStatus::Up => "up",
            DatabaseStatus::Down => "down",
            DatabaseStatus::Disabled => "disabled",
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: DatabaseStatus,
    pub event_handlers: usize,
}

/// GET /health: `503` when the configured database cannot be reached.
pub async fn check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.pool() {
        None => DatabaseStatus::Disabled,
        Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => DatabaseStatus::Up,
            Err(err) => {
                tracing::warn!(error = %err, "database health check failed");
                DatabaseStatus::Down
            }
        },
    };

    metrics::counter!("health_checks_total", "database" => database.as_str()).increment(1);

    let (code, status) = match database {
        DatabaseStatus::Down => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
        DatabaseStatus::Up | DatabaseStatus::Disabled => (StatusCode::OK, "ok"),
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            event_handlers: state.mediator().handler_count(),
        }),
    )
}
