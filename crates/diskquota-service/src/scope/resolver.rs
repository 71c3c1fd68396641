//! Maps a pending write to the ordered set of scopes it is charged to.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use diskquota_core::traits::AssetInventory;
use diskquota_entity::asset::PendingAsset;
use diskquota_entity::scope::Scope;

use crate::deadline;

/// Resolves which scopes a pending write is checked against.
///
/// The owner's account always comes first, followed by every collection
/// reachable from the containing item, direct assignments before
/// group-derived ones.
#[derive(Clone)]
pub struct ScopeResolver {
    inventory: Arc<dyn AssetInventory>,
    read_timeout: Duration,
}

impl std::fmt::Debug for ScopeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeResolver").finish()
    }
}

impl ScopeResolver {
    /// Creates a new resolver over `inventory`.
    pub fn new(inventory: Arc<dyn AssetInventory>, read_timeout: Duration) -> Self {
        Self {
            inventory,
            read_timeout,
        }
    }

    /// Resolve the ordered scope set for `pending`.
    ///
    /// A collection lookup that fails leaves the write charged to its
    /// account only.
    pub async fn resolve(&self, pending: &PendingAsset) -> Vec<Scope> {
        let mut scopes = vec![Scope::Account(pending.owner_id)];

        let Some(item_id) = pending.item_id else {
            return scopes;
        };

        let lookup = deadline::within(
            self.read_timeout,
            "Item collection lookup",
            self.inventory.collections_for_item(item_id),
        )
        .await;

        match lookup {
            Ok(collections) => {
                debug!(item_id = %item_id, collections = collections.len(), "Resolved item collections");
                scopes.extend(collections.into_iter().map(Scope::Collection));
            }
            Err(e) => {
                warn!(
                    item_id = %item_id,
                    error = %e,
                    "Could not resolve item collections, checking account scope only"
                );
            }
        }

        scopes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskquota_core::types::id::{AccountId, CollectionId, GroupId, ItemId};
    use diskquota_database::MemoryInventory;

    fn resolver(inventory: &MemoryInventory) -> ScopeResolver {
        ScopeResolver::new(Arc::new(inventory.clone()), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_account_only_without_item() {
        let inventory = MemoryInventory::new();
        let owner = AccountId::new();
        let scopes = resolver(&inventory)
            .resolve(&PendingAsset::create(owner, None, 10))
            .await;
        assert_eq!(scopes, vec![Scope::Account(owner)]);
    }

    #[tokio::test]
    async fn test_account_then_collections() {
        let inventory = MemoryInventory::new();
        let owner = AccountId::new();
        let item = ItemId::new();
        let direct = CollectionId::new();
        let grouped = CollectionId::new();
        let group = GroupId::new();
        inventory.assign_item(item, direct).await;
        inventory.add_item_to_group(item, group).await;
        inventory.link_group(group, grouped).await;

        let scopes = resolver(&inventory)
            .resolve(&PendingAsset::create(owner, Some(item), 10))
            .await;
        assert_eq!(
            scopes,
            vec![
                Scope::Account(owner),
                Scope::Collection(direct),
                Scope::Collection(grouped)
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_item_has_no_collection_scope() {
        let inventory = MemoryInventory::new();
        let owner = AccountId::new();
        let scopes = resolver(&inventory)
            .resolve(&PendingAsset::create(owner, Some(ItemId::new()), 10))
            .await;
        assert_eq!(scopes, vec![Scope::Account(owner)]);
    }

    #[tokio::test]
    async fn test_lookup_failure_omits_collections() {
        let inventory = MemoryInventory::new();
        inventory.faults().set_available(false);
        let owner = AccountId::new();
        let scopes = resolver(&inventory)
            .resolve(&PendingAsset::create(owner, Some(ItemId::new()), 10))
            .await;
        assert_eq!(scopes, vec![Scope::Account(owner)]);
    }
}
