//! Inventoried asset model.

use serde::{Deserialize, Serialize};

use diskquota_core::types::id::{AccountId, AssetId, ItemId};

/// A stored binary object as seen by the inventory.
///
/// Created by the host pipeline; the engine only reads assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset identifier.
    pub id: AssetId,
    /// Owning account.
    pub owner_id: AccountId,
    /// Containing item, through which collections are reached.
    pub item_id: Option<ItemId>,
    /// Size of the stored original in bytes.
    pub size_bytes: u64,
    /// Whether a durable original exists. Assets without one never count.
    pub has_original: bool,
}

impl Asset {
    /// Create an asset with a durable original.
    pub fn new(owner_id: AccountId, item_id: Option<ItemId>, size_bytes: u64) -> Self {
        Self {
            id: AssetId::new(),
            owner_id,
            item_id,
            size_bytes,
            has_original: true,
        }
    }

    /// Whether this asset counts toward usage.
    pub fn counts_toward_usage(&self) -> bool {
        self.has_original
    }
}
