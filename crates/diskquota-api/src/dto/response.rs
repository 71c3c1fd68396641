//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use diskquota_core::types::id::ReservationId;
use diskquota_entity::admission::{AdmissionDecision, ScopeCheck, SkipReason};
use diskquota_entity::quota::UsageReport;
use diskquota_service::EffectiveLimit;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status (`ok` or `degraded`).
    pub status: String,
    /// Server version.
    pub version: String,
    /// Whether the settings store answered.
    pub settings: bool,
    /// Whether the asset inventory answered.
    pub inventory: bool,
    /// Reservations currently held.
    pub reservations: usize,
}

/// Answer to an admission check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionResponse {
    /// Whether the write may proceed.
    pub admitted: bool,
    /// Whether any scope was admitted without a complete check.
    pub degraded: bool,
    /// Rejection message, if rejected.
    pub reason: Option<String>,
    /// Reservation to commit or abort, if one was taken.
    pub reservation_id: Option<ReservationId>,
    /// When an uncommitted reservation lapses.
    pub reservation_expires_at: Option<DateTime<Utc>>,
    /// Candidate size in bytes.
    pub candidate_bytes: u64,
    /// Per-scope evaluation.
    pub checks: Vec<ScopeCheck>,
    /// Why no scope was evaluated, if skipped.
    pub skipped: Option<SkipReason>,
}

impl AdmissionResponse {
    /// Build from a decision; `expires_at` applies only when a
    /// reservation was taken.
    pub fn new(decision: AdmissionDecision, expires_at: DateTime<Utc>) -> Self {
        Self {
            reason: decision.reason(),
            admitted: decision.admitted,
            degraded: decision.degraded,
            reservation_expires_at: decision.reservation_id.map(|_| expires_at),
            reservation_id: decision.reservation_id,
            candidate_bytes: decision.candidate_bytes,
            checks: decision.checks,
            skipped: decision.skipped,
        }
    }
}

/// Outcome of a commit or abort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationResponse {
    /// The released reservation.
    pub reservation_id: ReservationId,
    /// `committed` or `aborted`.
    pub status: String,
}

/// Effective limit plus usage for one scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaResponse {
    /// Effective limit and its origin.
    pub limit: EffectiveLimit,
    /// Usage report.
    pub usage: UsageReport,
}

/// Result of removing an override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideRemovedResponse {
    /// Whether an override existed.
    pub removed: bool,
    /// The limit now in effect.
    pub limit: EffectiveLimit,
}
