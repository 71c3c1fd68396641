//! Process-wide quota defaults.

use serde::{Deserialize, Serialize};

use diskquota_core::config::quota::{
    MAX_WARNING_THRESHOLD_PERCENT, MIN_WARNING_THRESHOLD_PERCENT, QuotaConfig,
};
use diskquota_core::error::AppError;

use crate::scope::ScopeKind;

/// Default limit per scope kind plus the warning threshold.
///
/// Passed explicitly to every component that needs it; there is no
/// ambient global copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDefaults {
    /// Default account quota in MB (0 = unlimited).
    pub account_mb: u64,
    /// Default collection quota in MB (0 = unlimited).
    pub collection_mb: u64,
    /// Global quota in MB. Not enforced by admission.
    pub global_mb: u64,
    /// Warn when remaining capacity is at or below this percentage.
    pub warning_threshold_percent: u32,
}

impl QuotaDefaults {
    /// Seed defaults from static configuration.
    pub fn from_config(config: &QuotaConfig) -> Self {
        Self {
            account_mb: config.default_account_mb,
            collection_mb: config.default_collection_mb,
            global_mb: config.default_global_mb,
            warning_threshold_percent: config.warning_threshold_percent,
        }
    }

    /// Check the threshold range; limits are unsigned and always valid.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_threshold(i64::from(self.warning_threshold_percent)).map(|_| ())
    }

    /// The default megabyte figure for a scope kind.
    pub fn mb_for(&self, kind: ScopeKind) -> u64 {
        match kind {
            ScopeKind::Account => self.account_mb,
            ScopeKind::Collection => self.collection_mb,
        }
    }
}

impl Default for QuotaDefaults {
    fn default() -> Self {
        Self::from_config(&QuotaConfig::default())
    }
}

/// Validate an operator-supplied warning threshold.
pub fn validate_threshold(value: i64) -> Result<u32, AppError> {
    let min = i64::from(MIN_WARNING_THRESHOLD_PERCENT);
    let max = i64::from(MAX_WARNING_THRESHOLD_PERCENT);
    if (min..=max).contains(&value) {
        // Range-checked above.
        Ok(value as u32)
    } else {
        Err(AppError::validation(format!(
            "Warning threshold must be between {min} and {max} percent, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_seeds() {
        let defaults = QuotaDefaults::default();
        assert_eq!(defaults.account_mb, 500);
        assert_eq!(defaults.collection_mb, 1000);
        assert_eq!(defaults.global_mb, 10_000);
        assert_eq!(defaults.warning_threshold_percent, 15);
    }

    #[test]
    fn test_mb_for_kind() {
        let defaults = QuotaDefaults {
            account_mb: 0,
            collection_mb: 10,
            ..QuotaDefaults::default()
        };
        assert_eq!(defaults.mb_for(ScopeKind::Account), 0);
        assert_eq!(defaults.mb_for(ScopeKind::Collection), 10);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(validate_threshold(0).is_err());
        assert!(validate_threshold(51).is_err());
        assert_eq!(validate_threshold(15).unwrap(), 15);
    }
}
