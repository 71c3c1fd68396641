//! Per-scope checks and the aggregate admission decision.

use serde::{Deserialize, Serialize};

use diskquota_core::types::id::ReservationId;

use super::rejection::QuotaRejection;
use crate::scope::Scope;

/// Result of evaluating one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The write fits under the limit.
    Admitted,
    /// The scope is unlimited.
    Unlimited,
    /// Usage or limit could not be read; admitted fail-open.
    Degraded,
    /// The write does not fit.
    Rejected,
}

impl CheckOutcome {
    /// Whether this outcome lets the write through.
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Evaluation of a single scope for one pending write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeCheck {
    /// The evaluated scope.
    pub scope: Scope,
    /// Outcome of the evaluation.
    pub outcome: CheckOutcome,
    /// Bytes consumed per the inventory, `None` when it could not be read.
    pub used_bytes: Option<u64>,
    /// Bytes held by other in-flight admissions at decision time.
    pub reserved_bytes: u64,
    /// Effective limit in bytes (0 = unlimited or unknown).
    pub limit_bytes: u64,
    /// Size of the candidate write in bytes.
    pub candidate_bytes: u64,
}

impl ScopeCheck {
    /// Rejection details when this check rejected the write.
    pub fn rejection(&self) -> Option<QuotaRejection> {
        (self.outcome == CheckOutcome::Rejected).then(|| QuotaRejection {
            scope: self.scope,
            used_bytes: self.used_bytes.unwrap_or(0).saturating_add(self.reserved_bytes),
            limit_bytes: self.limit_bytes,
            candidate_bytes: self.candidate_bytes,
        })
    }
}

/// Why a write was admitted without evaluating any scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Only creations are quota-checked.
    NotACreation,
    /// The write size is unknown (zero).
    UnknownSize,
}

/// The engine's answer to one admission request.
///
/// Ephemeral: constructed per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionDecision {
    /// Whether the write may proceed.
    pub admitted: bool,
    /// Whether any scope was admitted fail-open, or its usage could not be
    /// read even though the limit made it irrelevant.
    pub degraded: bool,
    /// Size of the candidate write in bytes.
    pub candidate_bytes: u64,
    /// Checks in evaluation order (accounts before collections). Stops at
    /// the first rejection.
    pub checks: Vec<ScopeCheck>,
    /// The first rejecting scope, if any.
    pub rejection: Option<QuotaRejection>,
    /// Reservation holding the admitted bytes until commit or abort.
    pub reservation_id: Option<ReservationId>,
    /// Set when no scope was evaluated.
    pub skipped: Option<SkipReason>,
}

impl AdmissionDecision {
    /// Decision for a write that bypasses quota checks.
    pub fn skipped(candidate_bytes: u64, reason: SkipReason) -> Self {
        Self {
            admitted: true,
            degraded: false,
            candidate_bytes,
            checks: Vec::new(),
            rejection: None,
            reservation_id: None,
            skipped: Some(reason),
        }
    }

    /// Build the aggregate decision from per-scope checks.
    ///
    /// The write is admitted only if every check admitted it.
    pub fn from_checks(candidate_bytes: u64, checks: Vec<ScopeCheck>) -> Self {
        let rejection = checks.iter().find_map(ScopeCheck::rejection);
        let degraded = checks
            .iter()
            .any(|c| c.outcome == CheckOutcome::Degraded || c.used_bytes.is_none());

        Self {
            admitted: rejection.is_none(),
            degraded,
            candidate_bytes,
            checks,
            rejection,
            reservation_id: None,
            skipped: None,
        }
    }

    /// The scope that decided the outcome: the rejecting scope, else the
    /// last evaluated one.
    pub fn deciding_scope(&self) -> Option<Scope> {
        self.rejection
            .map(|r| r.scope)
            .or_else(|| self.checks.last().map(|c| c.scope))
    }

    /// Human-readable reason for a rejection.
    pub fn reason(&self) -> Option<String> {
        self.rejection.as_ref().map(QuotaRejection::message)
    }
}
