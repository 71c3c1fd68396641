//! Settings key builders for every value DiskQuota persists.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the engine reads or writes.

use crate::types::id::{AccountId, CollectionId};

/// Prefix applied to all DiskQuota settings keys.
const PREFIX: &str = "diskquota";

// ── Per-scope overrides ────────────────────────────────────

/// Settings key holding an account's quota override in MB.
pub fn account_limit(account_id: AccountId) -> String {
    format!("{PREFIX}:account:{account_id}:limit_mb")
}

/// Settings key holding a collection's quota override in MB.
pub fn collection_limit(collection_id: CollectionId) -> String {
    format!("{PREFIX}:collection:{collection_id}:limit_mb")
}

// ── Process-wide defaults ──────────────────────────────────

/// Settings key for the default account quota in MB.
pub const DEFAULT_ACCOUNT_MB: &str = "diskquota:default:account_mb";

/// Settings key for the default collection quota in MB.
pub const DEFAULT_COLLECTION_MB: &str = "diskquota:default:collection_mb";

/// Settings key for the (unenforced) global quota in MB.
pub const DEFAULT_GLOBAL_MB: &str = "diskquota:default:global_mb";

/// Settings key for the warning threshold percentage.
pub const WARNING_THRESHOLD_PERCENT: &str = "diskquota:warning_threshold_percent";

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_scope_keys_are_namespaced() {
        let uuid = Uuid::new_v4();
        assert_eq!(
            account_limit(AccountId::from_uuid(uuid)),
            format!("diskquota:account:{uuid}:limit_mb")
        );
        assert_eq!(
            collection_limit(CollectionId::from_uuid(uuid)),
            format!("diskquota:collection:{uuid}:limit_mb")
        );
    }

    #[test]
    fn test_default_keys_share_prefix() {
        for key in [
            DEFAULT_ACCOUNT_MB,
            DEFAULT_COLLECTION_MB,
            DEFAULT_GLOBAL_MB,
            WARNING_THRESHOLD_PERCENT,
        ] {
            assert!(key.starts_with(PREFIX));
        }
    }
}
