//! Route definitions for the DiskQuota HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with every route and the request logger.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(admission_routes())
        .merge(quota_routes())
        .merge(admin_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Upload pipeline: check, commit, abort
fn admission_routes() -> Router<AppState> {
    Router::new()
        .route("/admissions", post(handlers::admission::check))
        .route("/admissions/{id}/commit", post(handlers::admission::commit))
        .route("/admissions/{id}/abort", post(handlers::admission::abort))
}

/// Read-only quota views
fn quota_routes() -> Router<AppState> {
    Router::new().route("/quotas/{kind}/{id}", get(handlers::quota::get_quota))
}

/// Admin: overrides and defaults
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/quotas/{kind}/{id}",
            put(handlers::admin::set_quota).delete(handlers::admin::remove_quota),
        )
        .route(
            "/admin/defaults",
            get(handlers::admin::get_defaults).put(handlers::admin::update_defaults),
        )
}
