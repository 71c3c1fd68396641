//! Read-only quota handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::response::{ApiResponse, QuotaResponse};
use crate::error::ApiError;
use crate::extractors::ScopePath;
use crate::state::AppState;

/// GET /api/quotas/{kind}/{id}
pub async fn get_quota(
    State(state): State<AppState>,
    Path(path): Path<ScopePath>,
) -> Result<Json<ApiResponse<QuotaResponse>>, ApiError> {
    let scope = path.scope()?;
    let limit = state.engine.admin.get_effective_limit(scope).await?;
    let usage = state.engine.admin.get_usage_report(scope).await?;
    Ok(Json(ApiResponse::ok(QuotaResponse { limit, usage })))
}
