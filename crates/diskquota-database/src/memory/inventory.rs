//! In-memory asset inventory.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use diskquota_core::result::AppResult;
use diskquota_core::traits::{AssetInventory, UsageTally};
use diskquota_core::types::id::{AccountId, AssetId, CollectionId, GroupId, ItemId};
use diskquota_entity::asset::Asset;

use super::faults::FaultSwitch;

#[derive(Debug, Default)]
struct InventoryState {
    assets: HashMap<AssetId, Asset>,
    item_collections: HashMap<ItemId, BTreeSet<CollectionId>>,
    item_groups: HashMap<ItemId, BTreeSet<GroupId>>,
    group_collections: HashMap<GroupId, BTreeSet<CollectionId>>,
}

impl InventoryState {
    /// Items reachable by a collection through any path, deduplicated.
    fn items_in(&self, collection_id: CollectionId) -> HashSet<ItemId> {
        let groups: HashSet<GroupId> = self
            .group_collections
            .iter()
            .filter(|(_, cols)| cols.contains(&collection_id))
            .map(|(g, _)| *g)
            .collect();

        let direct = self
            .item_collections
            .iter()
            .filter(|(_, cols)| cols.contains(&collection_id))
            .map(|(i, _)| *i);

        let via_group = self
            .item_groups
            .iter()
            .filter(|(_, gs)| gs.iter().any(|g| groups.contains(g)))
            .map(|(i, _)| *i);

        direct.chain(via_group).collect()
    }
}

/// Asset inventory held in process memory.
#[derive(Debug, Clone)]
pub struct MemoryInventory {
    state: Arc<RwLock<InventoryState>>,
    faults: Arc<FaultSwitch>,
}

impl MemoryInventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(InventoryState::default())),
            faults: Arc::new(FaultSwitch::new("asset inventory")),
        }
    }

    /// Failure toggles for this inventory.
    pub fn faults(&self) -> &FaultSwitch {
        &self.faults
    }

    /// Insert or replace an asset.
    pub async fn add_asset(&self, asset: Asset) {
        self.state.write().await.assets.insert(asset.id, asset);
    }

    /// Assign an item directly to a collection.
    pub async fn assign_item(&self, item_id: ItemId, collection_id: CollectionId) {
        self.state
            .write()
            .await
            .item_collections
            .entry(item_id)
            .or_default()
            .insert(collection_id);
    }

    /// Add an item to a group.
    pub async fn add_item_to_group(&self, item_id: ItemId, group_id: GroupId) {
        self.state
            .write()
            .await
            .item_groups
            .entry(item_id)
            .or_default()
            .insert(group_id);
    }

    /// Link a group to a collection.
    pub async fn link_group(&self, group_id: GroupId, collection_id: CollectionId) {
        self.state
            .write()
            .await
            .group_collections
            .entry(group_id)
            .or_default()
            .insert(collection_id);
    }
}

impl Default for MemoryInventory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetInventory for MemoryInventory {
    async fn account_usage(&self, account_id: AccountId) -> AppResult<UsageTally> {
        self.faults.enter().await?;
        let state = self.state.read().await;

        Ok(state
            .assets
            .values()
            .filter(|a| a.counts_toward_usage() && a.owner_id == account_id)
            .fold(UsageTally::default(), |acc, a| {
                UsageTally::new(acc.bytes.saturating_add(a.size_bytes), acc.assets + 1)
            }))
    }

    async fn collection_usage(&self, collection_id: CollectionId) -> AppResult<UsageTally> {
        self.faults.enter().await?;
        let state = self.state.read().await;
        let items = state.items_in(collection_id);

        Ok(state
            .assets
            .values()
            .filter(|a| a.counts_toward_usage())
            .filter(|a| a.item_id.is_some_and(|i| items.contains(&i)))
            .fold(UsageTally::default(), |acc, a| {
                UsageTally::new(acc.bytes.saturating_add(a.size_bytes), acc.assets + 1)
            }))
    }

    async fn collections_for_item(&self, item_id: ItemId) -> AppResult<Vec<CollectionId>> {
        self.faults.enter().await?;
        let state = self.state.read().await;

        let mut collections: Vec<CollectionId> = state
            .item_collections
            .get(&item_id)
            .map(|cols| cols.iter().copied().collect())
            .unwrap_or_default();

        let via_groups: BTreeSet<CollectionId> = state
            .item_groups
            .get(&item_id)
            .into_iter()
            .flatten()
            .filter_map(|g| state.group_collections.get(g))
            .flatten()
            .copied()
            .collect();

        for id in via_groups {
            if !collections.contains(&id) {
                collections.push(id);
            }
        }
        Ok(collections)
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.faults.enter().await?;
        Ok(true)
    }
}
