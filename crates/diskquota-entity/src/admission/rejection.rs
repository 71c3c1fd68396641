//! Structured rejection reason.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scope::{Scope, ScopeKind};
use crate::units::format_mb;

/// Why a write was rejected: the first scope that could not fit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRejection {
    /// The rejecting scope.
    pub scope: Scope,
    /// Bytes counted against the scope at decision time, including
    /// capacity reserved by writes still in flight.
    pub used_bytes: u64,
    /// Effective limit in bytes.
    pub limit_bytes: u64,
    /// Size of the rejected write in bytes.
    pub candidate_bytes: u64,
}

impl QuotaRejection {
    /// The rejecting scope's kind.
    pub fn scope_kind(&self) -> ScopeKind {
        self.scope.kind()
    }

    /// Human-readable message with two-decimal megabyte figures.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QuotaRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Upload rejected: {} quota exceeded for {}. File: {} MB, Used: {} MB, Limit: {} MB",
            self.scope.kind(),
            self.scope.id(),
            format_mb(self.candidate_bytes),
            format_mb(self.used_bytes),
            format_mb(self.limit_bytes),
        )
    }
}
