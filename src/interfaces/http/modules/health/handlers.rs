//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::interfaces::http::router::AppState;

#[derive(Clone)]
pub struct HealthState {
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// Service health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = probe_database(&state.db).await;
    let healthy = database.status == "ok";

    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database,
    };
    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(body))
}

/// Round-trips `SELECT 1` and reports how long it took.
async fn probe_database(db: &DatabaseConnection) -> ComponentHealth {
    let started = Instant::now();
    let probe = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());
    match db.execute(probe).await {
        Ok(_) => ComponentHealth {
            status: "ok".to_string(),
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            warn!("Health probe failed: {}", e);
            ComponentHealth {
                status: "error".to_string(),
                latency_ms: None,
            }
        }
    }
}
