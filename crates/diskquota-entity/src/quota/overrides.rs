//! Per-scope quota overrides.

use serde::{Deserialize, Serialize};

use diskquota_core::error::AppError;

use super::limit::QuotaLimit;
use crate::scope::Scope;

/// An explicit limit for one scope, set by an administrator.
///
/// Overrides are never removed automatically; `limit_mb == 0` is a valid
/// explicit value meaning unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaOverride {
    /// The scope the override applies to.
    pub scope: Scope,
    /// Limit in megabytes (0 = unlimited).
    pub limit_mb: u64,
}

impl QuotaOverride {
    /// Validate an operator-supplied megabyte value.
    ///
    /// Negative values are rejected, never clamped.
    pub fn new(scope: Scope, limit_mb: i64) -> Result<Self, AppError> {
        Ok(Self {
            scope,
            limit_mb: validate_mb(limit_mb, "Quota")?,
        })
    }

    /// Rebuild an override from a stored settings value.
    ///
    /// A negative stored value is a data-integrity violation and is
    /// reported as a configuration error.
    pub fn from_stored(scope: Scope, stored: i64) -> Result<Self, AppError> {
        u64::try_from(stored)
            .map(|limit_mb| Self { scope, limit_mb })
            .map_err(|_| {
                AppError::configuration(format!(
                    "Stored quota for {scope} is negative ({stored} MB)"
                ))
            })
    }

    /// The effective limit this override represents.
    pub fn limit(&self) -> QuotaLimit {
        QuotaLimit::from_mb(self.limit_mb)
    }
}

/// Validate a non-negative megabyte figure coming from an operator.
pub fn validate_mb(value: i64, label: &str) -> Result<u64, AppError> {
    u64::try_from(value).map_err(|_| {
        AppError::validation(format!(
            "{label} must be zero (unlimited) or a positive number of MB, got {value}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskquota_core::error::ErrorKind;
    use diskquota_core::types::id::AccountId;

    #[test]
    fn test_negative_override_rejected() {
        let scope = Scope::Account(AccountId::new());
        let err = QuotaOverride::new(scope, -1).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_zero_override_is_unlimited() {
        let scope = Scope::Account(AccountId::new());
        let ov = QuotaOverride::new(scope, 0).expect("zero is valid");
        assert!(ov.limit().is_unlimited());
    }

    #[test]
    fn test_negative_stored_value_is_configuration_error() {
        let scope = Scope::Account(AccountId::new());
        let err = QuotaOverride::from_stored(scope, -5).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
