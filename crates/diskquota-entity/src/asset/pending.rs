//! Pending asset writes submitted for admission.

use serde::{Deserialize, Serialize};

use diskquota_core::types::id::{AccountId, ItemId};

/// The kind of write the host pipeline is about to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetOperation {
    /// A new asset is being stored. Only creations are quota-checked.
    #[default]
    Create,
    /// An existing asset is being modified.
    Update,
}

/// A write the host wants to make durable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAsset {
    /// The account that will own the asset.
    pub owner_id: AccountId,
    /// The item that will contain the asset, if any.
    pub item_id: Option<ItemId>,
    /// Size of the candidate write in bytes (0 = unknown).
    pub size_bytes: u64,
    /// Write kind.
    #[serde(default)]
    pub operation: AssetOperation,
}

impl PendingAsset {
    /// A pending creation.
    pub fn create(owner_id: AccountId, item_id: Option<ItemId>, size_bytes: u64) -> Self {
        Self {
            owner_id,
            item_id,
            size_bytes,
            operation: AssetOperation::Create,
        }
    }

    /// Whether this write is subject to quota checks at all.
    ///
    /// Updates and writes of unknown size pass through unchecked.
    pub fn requires_check(&self) -> bool {
        self.operation == AssetOperation::Create && self.size_bytes > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_sized_creations_are_checked() {
        let owner = AccountId::new();
        assert!(PendingAsset::create(owner, None, 10).requires_check());
        assert!(!PendingAsset::create(owner, None, 0).requires_check());

        let update = PendingAsset {
            operation: AssetOperation::Update,
            ..PendingAsset::create(owner, None, 10)
        };
        assert!(!update.requires_check());
    }

    #[test]
    fn test_operation_defaults_to_create() {
        let owner = AccountId::new();
        let json = serde_json::json!({ "owner_id": owner, "item_id": null, "size_bytes": 5 });
        let pending: PendingAsset = serde_json::from_value(json).expect("deserialize");
        assert_eq!(pending.operation, AssetOperation::Create);
    }
}
