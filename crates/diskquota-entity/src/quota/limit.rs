//! Effective quota limit.

use serde::{Deserialize, Serialize};

use crate::units::{BYTES_PER_MB, mb_to_bytes};

/// The effective byte limit of a scope.
///
/// `0` is the unlimited sentinel at every external layer; internally the
/// distinction is explicit so that no caller can compare against a zero
/// limit by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaLimit {
    /// A fixed maximum in bytes (always greater than zero).
    Bytes(u64),
    /// No limit.
    Unlimited,
}

impl QuotaLimit {
    /// Build a limit from a configured megabyte figure. `0` means unlimited.
    pub fn from_mb(mb: u64) -> Self {
        Self::from_bytes(mb_to_bytes(mb))
    }

    /// Build a limit from bytes. `0` means unlimited.
    pub fn from_bytes(bytes: u64) -> Self {
        if bytes == 0 {
            Self::Unlimited
        } else {
            Self::Bytes(bytes)
        }
    }

    /// Whether this limit is the unlimited sentinel.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// The limit in bytes, `0` for unlimited.
    pub fn bytes(&self) -> u64 {
        match self {
            Self::Bytes(bytes) => *bytes,
            Self::Unlimited => 0,
        }
    }

    /// The limit in whole megabytes, `0` for unlimited.
    pub fn mb(&self) -> u64 {
        self.bytes() / BYTES_PER_MB
    }

    /// Whether `used + candidate` stays within the limit.
    ///
    /// The boundary is inclusive: filling a scope exactly to its limit is
    /// allowed.
    pub fn admits(&self, used: u64, candidate: u64) -> bool {
        match self {
            Self::Bytes(limit) => used.saturating_add(candidate) <= *limit,
            Self::Unlimited => true,
        }
    }
}

impl From<u64> for QuotaLimit {
    /// Convert a megabyte figure. `0` means unlimited.
    fn from(mb: u64) -> Self {
        Self::from_mb(mb)
    }
}
