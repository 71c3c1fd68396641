//! # diskquota-api
//!
//! HTTP API layer for DiskQuota built on Axum.
//!
//! Exposes the admission check used by the host upload pipeline, quota
//! reports, and the admin endpoints for overrides and defaults.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
