//! Asset inventory trait used for usage aggregation and scope resolution.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::types::id::{AccountId, CollectionId, ItemId};

/// Aggregated consumption of a scope as reported by the inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTally {
    /// Sum of `size_bytes` over counted assets.
    pub bytes: u64,
    /// Number of counted assets.
    pub assets: u64,
}

impl UsageTally {
    /// Create a tally from raw figures.
    pub fn new(bytes: u64, assets: u64) -> Self {
        Self { bytes, assets }
    }
}

/// Read-only view over the host's asset inventory.
///
/// Only assets with a durable original count toward usage. Implementations
/// must count each asset at most once per scope, even when it is reachable
/// through several paths into the same collection.
#[async_trait]
pub trait AssetInventory: Send + Sync + 'static {
    /// Usage of all durable-original assets owned by an account.
    async fn account_usage(&self, account_id: AccountId) -> AppResult<UsageTally>;

    /// Usage of all durable-original assets reachable by a collection,
    /// directly or through a group, counted once per asset.
    async fn collection_usage(&self, collection_id: CollectionId) -> AppResult<UsageTally>;

    /// Collections an item belongs to: direct assignments first, then
    /// group-derived ones, without duplicates, in a stable order.
    ///
    /// An unknown item yields an empty list.
    async fn collections_for_item(&self, item_id: ItemId) -> AppResult<Vec<CollectionId>>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
