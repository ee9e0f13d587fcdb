//! Liveness and database health

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct HealthState {
    /// `None` when the service runs on in-memory storage
    pub db: Option<DatabaseConnection>,
    pub started_at: Arc<Instant>,
}

impl HealthState {
    pub fn new(db: Option<DatabaseConnection>) -> Self {
        Self {
            db,
            started_at: Arc::new(Instant::now()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    /// `ok`, `error` or `in_memory`
    pub status: String,
    pub latency_ms: Option<u64>,
}

impl ComponentHealth {
    fn is_up(&self) -> bool {
        self.status != "error"
    }
}

async fn ping(db: &DatabaseConnection) -> ComponentHealth {
    let started = Instant::now();
    let probe = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());
    match db.execute(probe).await {
        Ok(_) => ComponentHealth {
            status: "ok".into(),
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe failed");
            ComponentHealth {
                status: "error".into(),
                latency_ms: None,
            }
        }
    }
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
    let database = match &state.db {
        Some(db) => ping(db).await,
        None => ComponentHealth {
            status: "in_memory".into(),
            latency_ms: None,
        },
    };
    let (code, status) = if database.is_up() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (
        code,
        Json(HealthResponse {
            status: status.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_is_healthy() {
        let (code, Json(body)) = health_check(State(HealthState::new(None))).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.database.status, "in_memory");
    }

    #[tokio::test]
    async fn sqlite_ping_reports_latency() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let (code, Json(body)) = health_check(State(HealthState::new(Some(db)))).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.database.status, "ok");
        assert!(body.database.latency_ms.is_some());
    }
}
