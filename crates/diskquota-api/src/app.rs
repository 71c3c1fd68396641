//! Application builder and server runner.

use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use diskquota_core::config::AppConfig;
use diskquota_core::config::app::CorsConfig;
use diskquota_core::error::AppError;
use diskquota_database::Backends;
use diskquota_service::QuotaEngine;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Runs the DiskQuota server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting DiskQuota v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Backends ─────────────────────────────────────────
    let backends = Backends::connect(&config.database, true).await?;

    // ── Step 2: Quota engine ─────────────────────────────────────
    let engine = QuotaEngine::new(
        backends.settings.clone(),
        backends.inventory.clone(),
        &config.quota,
    )
    .await?;

    if !config.api.admin_enabled() {
        warn!("api.admin_token is empty; admin endpoints are disabled");
    }

    // ── Step 3: Reservation sweeper ──────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = engine.sweeper.clone();
    let sweeper_handle = tokio::spawn(async move {
        sweeper.run(shutdown_rx).await;
    });

    // ── Step 4: HTTP server ──────────────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let cors = config.server.cors.clone();
    let app = build_app(AppState::new(config, engine), &cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(addr = %addr, "DiskQuota server listening");

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, starting graceful shutdown");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 5: Drain background tasks ───────────────────────────
    if tokio::time::timeout(grace, sweeper_handle).await.is_err() {
        warn!("Reservation sweeper did not stop within the grace period");
    }
    backends.close().await;

    info!("DiskQuota server shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
