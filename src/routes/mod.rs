//! HTTP route handlers (DTO boundary).

pub mod cases;
pub mod clients;
pub mod system;

use crate::config::Settings;
use crate::error::AppError;
use crate::infra::DbPool;
use axum::http::HeaderValue;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: DbPool, settings: Settings) -> Self {
        Self {
            db: Arc::new(db),
            settings: Arc::new(settings),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Run a use case on the blocking pool. The connection lock is taken inside
/// `f` and released when it returns, success or not.
pub(crate) async fn run_blocking<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&DbPool) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(&state.db);
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() || settings.cors_origins.iter().any(|o| o == "*") {
        // Wildcard origins cannot be combined with credentials.
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Full application router: system endpoints, both resource groups, CORS
/// and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings);
    Router::new()
        .merge(system::system_routes())
        .merge(clients::client_routes())
        .merge(cases::case_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
