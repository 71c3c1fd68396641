//! Admission handlers for the upload pipeline.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};

use crate::dto::request::AdmissionRequest;
use crate::dto::response::{AdmissionResponse, ApiResponse, ReservationResponse};
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, parse_reservation_id};
use crate::state::AppState;

/// POST /api/admissions
///
/// A rejection is a normal outcome and returns 200 with `admitted: false`.
/// An admitted write that reserved capacity returns a `reservation_id`
/// that must be committed or aborted before the reservation expires.
pub async fn check(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AdmissionRequest>,
) -> Result<Json<ApiResponse<AdmissionResponse>>, ApiError> {
    let pending = req.into_pending();
    let admission = state.engine.controller.check(&pending).await?;
    let ttl = state.engine.controller.ledger().ttl();
    let expires_at = chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let decision = admission.detach();
    Ok(Json(ApiResponse::ok(AdmissionResponse::new(decision, expires_at))))
}

/// POST /api/admissions/{id}/commit
pub async fn commit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationResponse>>, ApiError> {
    let reservation_id = parse_reservation_id(&id)?;
    state.engine.controller.commit(reservation_id).await?;
    Ok(Json(ApiResponse::ok(ReservationResponse {
        reservation_id,
        status: "committed".to_string(),
    })))
}

/// POST /api/admissions/{id}/abort
pub async fn abort(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationResponse>>, ApiError> {
    let reservation_id = parse_reservation_id(&id)?;
    state.engine.controller.abort(reservation_id).await?;
    Ok(Json(ApiResponse::ok(ReservationResponse {
        reservation_id,
        status: "aborted".to_string(),
    })))
}
