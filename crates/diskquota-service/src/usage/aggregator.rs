//! Usage aggregator: current consumption per scope, uncached.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use diskquota_core::result::AppResult;
use diskquota_core::traits::{AssetInventory, UsageTally};
use diskquota_entity::scope::Scope;

use crate::deadline;

/// Outcome of a usage read that may fail open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    /// The inventory answered.
    Known(UsageTally),
    /// The read failed or timed out.
    Unknown,
}

impl Usage {
    /// Bytes consumed, if known.
    pub fn bytes(&self) -> Option<u64> {
        match self {
            Self::Known(tally) => Some(tally.bytes),
            Self::Unknown => None,
        }
    }

    /// Whether the read failed.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Computes bytes consumed by a scope from the asset inventory.
#[derive(Clone)]
pub struct UsageAggregator {
    inventory: Arc<dyn AssetInventory>,
    read_timeout: Duration,
}

impl std::fmt::Debug for UsageAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageAggregator")
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

impl UsageAggregator {
    /// Creates a new aggregator over `inventory`.
    pub fn new(inventory: Arc<dyn AssetInventory>, read_timeout: Duration) -> Self {
        Self {
            inventory,
            read_timeout,
        }
    }

    /// Read usage, propagating failures. Used by reports.
    pub async fn tally(&self, scope: Scope) -> AppResult<UsageTally> {
        let read = async {
            match scope {
                Scope::Account(id) => self.inventory.account_usage(id).await,
                Scope::Collection(id) => self.inventory.collection_usage(id).await,
            }
        };
        deadline::within(self.read_timeout, "Usage read", read).await
    }

    /// Read usage, mapping any failure to [`Usage::Unknown`].
    pub async fn usage(&self, scope: Scope) -> Usage {
        match self.tally(scope).await {
            Ok(tally) => Usage::Known(tally),
            Err(e) => {
                warn!(scope = %scope, error = %e, "Usage read failed, treating as unknown");
                Usage::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskquota_core::error::ErrorKind;
    use diskquota_core::types::id::AccountId;
    use diskquota_database::MemoryInventory;
    use diskquota_entity::asset::Asset;

    #[tokio::test]
    async fn test_known_usage() {
        let inventory = MemoryInventory::new();
        let owner = AccountId::new();
        inventory.add_asset(Asset::new(owner, None, 1024)).await;

        let aggregator = UsageAggregator::new(Arc::new(inventory), Duration::from_secs(1));
        let usage = aggregator.usage(Scope::Account(owner)).await;
        assert_eq!(usage, Usage::Known(UsageTally::new(1024, 1)));
        assert_eq!(usage.bytes(), Some(1024));
    }

    #[tokio::test]
    async fn test_failure_is_unknown() {
        let inventory = MemoryInventory::new();
        inventory.faults().set_available(false);

        let aggregator = UsageAggregator::new(Arc::new(inventory), Duration::from_secs(1));
        let usage = aggregator.usage(Scope::Account(AccountId::new())).await;
        assert!(usage.is_unknown());
        assert_eq!(usage.bytes(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_read_times_out() {
        let inventory = MemoryInventory::new();
        inventory.faults().set_latency(Duration::from_secs(10));

        let aggregator = UsageAggregator::new(Arc::new(inventory), Duration::from_millis(50));
        let err = aggregator
            .tally(Scope::Account(AccountId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
    }
}
