//! `AdminAccess` extractor: turns the admin token header into an
//! [`AdminContext`] capability.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use diskquota_core::error::AppError;
use diskquota_service::AdminContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared admin secret.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Header naming the acting operator, for audit logs.
pub const ADMIN_ACTOR_HEADER: &str = "x-admin-actor";

/// Admin capability extracted from request headers.
///
/// A missing token is an authentication failure. A wrong token yields an
/// unauthorized context, which the services reject.
#[derive(Debug, Clone)]
pub struct AdminAccess(pub AdminContext);

impl std::ops::Deref for AdminAccess {
    type Target = AdminContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.config.api.admin_enabled() {
            return Err(AppError::authorization("Admin API is disabled").into());
        }

        let token = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing admin token"))?;

        let actor = parts
            .headers
            .get(ADMIN_ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("api")
            .to_string();

        let ctx = if token == state.config.api.admin_token {
            AdminContext::authorized(actor)
        } else {
            tracing::warn!(actor = %actor, "Admin request with invalid token");
            AdminContext::unauthorized(actor)
        };

        Ok(AdminAccess(ctx))
    }
}
