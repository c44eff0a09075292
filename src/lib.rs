pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod routes;

use config::{DbTarget, Settings};
use error::AppError;
use infra::{init_db, init_memory_db, DbPool};
use routes::{build_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise `debug` when the debug flag is set, else `info`.
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();
}

/// Open the configured database and bring its schema up to date.
pub fn open_database(settings: &Settings) -> anyhow::Result<DbPool> {
    let pool = match settings.db_target()? {
        DbTarget::File(path) => {
            tracing::info!("DB path: {:?}", path);
            init_db(&path)
        }
        DbTarget::Memory => {
            tracing::warn!("using in-memory database; data is lost on exit");
            init_memory_db()
        }
    };
    pool.map_err(|e: AppError| {
        tracing::error!("DB init failed: {}", e);
        e.into()
    })
}

/// Serve the API until Ctrl-C.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let pool = open_database(&settings)?;

    let addr = settings.socket_addr();
    let app = build_router(AppState::new(pool, settings));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
