//! Quota engine configuration.
//!
//! The limit values here only seed the defaults registry: values persisted
//! in the settings store take precedence once loaded.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lowest accepted warning threshold percentage.
pub const MIN_WARNING_THRESHOLD_PERCENT: u32 = 1;

/// Highest accepted warning threshold percentage.
pub const MAX_WARNING_THRESHOLD_PERCENT: u32 = 50;

/// Quota defaults, read deadlines and reservation lifetimes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Default account quota in MB (0 = unlimited).
    #[serde(default = "default_account_mb")]
    pub default_account_mb: u64,
    /// Default collection quota in MB (0 = unlimited).
    #[serde(default = "default_collection_mb")]
    pub default_collection_mb: u64,
    /// Global quota in MB. Stored and displayed, never enforced.
    #[serde(default = "default_global_mb")]
    pub default_global_mb: u64,
    /// Warn when remaining capacity falls to this percentage or below.
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold_percent: u32,
    /// Deadline for a single settings or inventory read, in milliseconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,
    /// Lifetime of an uncommitted reservation, in seconds.
    #[serde(default = "default_reservation_ttl")]
    pub reservation_ttl_seconds: u64,
    /// How often expired reservations are purged, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl QuotaConfig {
    /// Validate ranges the admin form would also enforce.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(MIN_WARNING_THRESHOLD_PERCENT..=MAX_WARNING_THRESHOLD_PERCENT)
            .contains(&self.warning_threshold_percent)
        {
            return Err(AppError::configuration(format!(
                "quota.warning_threshold_percent must be between {MIN_WARNING_THRESHOLD_PERCENT} and {MAX_WARNING_THRESHOLD_PERCENT}, got {}",
                self.warning_threshold_percent
            )));
        }
        if self.read_timeout_ms == 0 {
            return Err(AppError::configuration(
                "quota.read_timeout_ms must be greater than zero",
            ));
        }
        if self.reservation_ttl_seconds == 0 {
            return Err(AppError::configuration(
                "quota.reservation_ttl_seconds must be greater than zero",
            ));
        }
        if self.sweep_interval_seconds == 0 {
            return Err(AppError::configuration(
                "quota.sweep_interval_seconds must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Read deadline as a [`Duration`].
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Reservation lifetime as a [`Duration`].
    pub fn reservation_ttl(&self) -> Duration {
        Duration::from_secs(self.reservation_ttl_seconds)
    }

    /// Sweep interval as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_account_mb: default_account_mb(),
            default_collection_mb: default_collection_mb(),
            default_global_mb: default_global_mb(),
            warning_threshold_percent: default_warning_threshold(),
            read_timeout_ms: default_read_timeout(),
            reservation_ttl_seconds: default_reservation_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_account_mb() -> u64 {
    500
}

fn default_collection_mb() -> u64 {
    1000
}

fn default_global_mb() -> u64 {
    10_000
}

fn default_warning_threshold() -> u32 {
    15
}

fn default_read_timeout() -> u64 {
    5_000
}

fn default_reservation_ttl() -> u64 {
    300
}

fn default_sweep_interval() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_bounds() {
        let mut config = QuotaConfig::default();
        config.warning_threshold_percent = 0;
        assert!(config.validate().is_err());
        config.warning_threshold_percent = 51;
        assert!(config.validate().is_err());
        config.warning_threshold_percent = 50;
        assert!(config.validate().is_ok());
        config.warning_threshold_percent = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = QuotaConfig {
            reservation_ttl_seconds: 0,
            ..QuotaConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
