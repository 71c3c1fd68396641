//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use diskquota_core::config::AppConfig;
use diskquota_service::QuotaEngine;

/// Application state passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The assembled quota engine.
    pub engine: Arc<QuotaEngine>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: AppConfig, engine: QuotaEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}
