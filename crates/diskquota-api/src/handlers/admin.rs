//! Admin handlers for overrides and defaults.

use axum::Json;
use axum::extract::{Path, State};

use diskquota_entity::quota::{QuotaDefaults, QuotaOverride};

use crate::dto::request::{SetQuotaRequest, UpdateDefaultsRequest};
use crate::dto::response::{ApiResponse, OverrideRemovedResponse};
use crate::error::ApiError;
use crate::extractors::{AdminAccess, ScopePath, ValidatedJson};
use crate::state::AppState;

/// PUT /api/admin/quotas/{kind}/{id}
pub async fn set_quota(
    State(state): State<AppState>,
    admin: AdminAccess,
    Path(path): Path<ScopePath>,
    ValidatedJson(req): ValidatedJson<SetQuotaRequest>,
) -> Result<Json<ApiResponse<QuotaOverride>>, ApiError> {
    let scope = path.scope()?;
    let ov = state
        .engine
        .admin
        .set_override(&admin, scope, req.limit_mb)
        .await?;
    Ok(Json(ApiResponse::ok(ov)))
}

/// DELETE /api/admin/quotas/{kind}/{id}
pub async fn remove_quota(
    State(state): State<AppState>,
    admin: AdminAccess,
    Path(path): Path<ScopePath>,
) -> Result<Json<ApiResponse<OverrideRemovedResponse>>, ApiError> {
    let scope = path.scope()?;
    let removed = state.engine.admin.remove_override(&admin, scope).await?;
    let limit = state.engine.admin.get_effective_limit(scope).await?;
    Ok(Json(ApiResponse::ok(OverrideRemovedResponse {
        removed,
        limit,
    })))
}

/// GET /api/admin/defaults
pub async fn get_defaults(
    State(state): State<AppState>,
    admin: AdminAccess,
) -> Result<Json<ApiResponse<QuotaDefaults>>, ApiError> {
    admin.require_authorized()?;
    Ok(Json(ApiResponse::ok(state.engine.admin.get_defaults().await)))
}

/// PUT /api/admin/defaults
pub async fn update_defaults(
    State(state): State<AppState>,
    admin: AdminAccess,
    ValidatedJson(req): ValidatedJson<UpdateDefaultsRequest>,
) -> Result<Json<ApiResponse<QuotaDefaults>>, ApiError> {
    let defaults = state
        .engine
        .admin
        .update_defaults(&admin, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(defaults)))
}
