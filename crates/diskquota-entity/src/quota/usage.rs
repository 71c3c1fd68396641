//! Usage report value object shown to operators.

use serde::{Deserialize, Serialize};

use diskquota_core::traits::inventory::UsageTally;

use super::limit::QuotaLimit;
use crate::scope::Scope;
use crate::units::bytes_to_mb;

/// Display state derived from usage and the warning threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageState {
    /// The scope has no limit.
    Unlimited,
    /// Comfortably below the limit.
    Normal,
    /// Remaining capacity is within the warning threshold.
    Warning,
    /// Usage is above the limit.
    Exceeded,
}

/// Usage figures for one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    /// The reported scope.
    pub scope: Scope,
    /// Bytes consumed by counted assets.
    pub used_bytes: u64,
    /// Limit in bytes (0 = unlimited).
    pub limit_bytes: u64,
    /// Number of counted assets.
    pub asset_count: u64,
    /// Used megabytes, two decimals.
    pub used_mb: f64,
    /// Limit megabytes, two decimals (0 = unlimited).
    pub limit_mb: f64,
    /// Usage percentage (0.0 - 100.0+, None if unlimited).
    pub usage_percent: Option<f64>,
    /// Remaining bytes (None if unlimited).
    pub remaining_bytes: Option<u64>,
    /// Whether remaining capacity is within the warning threshold.
    pub warn: bool,
    /// Derived display state.
    pub state: UsageState,
}

impl UsageReport {
    /// Build a report from an inventory tally and the effective limit.
    pub fn new(scope: Scope, tally: UsageTally, limit: QuotaLimit, threshold_percent: u32) -> Self {
        let used_bytes = tally.bytes;

        let (usage_percent, remaining_bytes, warn, state) = match limit {
            QuotaLimit::Unlimited => (None, None, false, UsageState::Unlimited),
            QuotaLimit::Bytes(limit_bytes) => {
                let percent = (used_bytes as f64 / limit_bytes as f64) * 100.0;
                let remaining = limit_bytes.saturating_sub(used_bytes);
                let warn = within_threshold(remaining, limit_bytes, threshold_percent);
                let state = if used_bytes > limit_bytes {
                    UsageState::Exceeded
                } else if warn {
                    UsageState::Warning
                } else {
                    UsageState::Normal
                };
                (
                    Some((percent * 100.0).round() / 100.0),
                    Some(remaining),
                    warn,
                    state,
                )
            }
        };

        Self {
            scope,
            used_bytes,
            limit_bytes: limit.bytes(),
            asset_count: tally.assets,
            used_mb: bytes_to_mb(used_bytes),
            limit_mb: bytes_to_mb(limit.bytes()),
            usage_percent,
            remaining_bytes,
            warn,
            state,
        }
    }
}

/// `remaining / limit <= threshold / 100`, in integer arithmetic.
fn within_threshold(remaining: u64, limit: u64, threshold_percent: u32) -> bool {
    u128::from(remaining) * 100 <= u128::from(limit) * u128::from(threshold_percent)
}
