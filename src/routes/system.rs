//! Service banner and health probe.

use super::{run_blocking, AppState};
use crate::infra::get_connection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

pub const SERVICE_NAME: &str = "PayAssured CRM API";

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub description: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

async fn root() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: SERVICE_NAME,
        description: "Internal CRM module for PayAssured",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let probe = run_blocking(&state, |db| {
        let conn = get_connection(db);
        conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))?;
        Ok(())
    })
    .await;

    match probe {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "up",
            }),
        ),
        Err(err) => {
            tracing::error!(error = %err, "database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy",
                    database: "down",
                }),
            )
        }
    }
}
