//! Asset inventory repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use diskquota_core::error::{AppError, ErrorKind};
use diskquota_core::result::AppResult;
use diskquota_core::traits::{AssetInventory, UsageTally};
use diskquota_core::types::id::{AccountId, CollectionId, ItemId};

use crate::connection::ping;

/// Sum and count of durable-original assets owned by an account.
const ACCOUNT_USAGE_SQL: &str = "\
    SELECT COALESCE(SUM(a.size_bytes), 0)::BIGINT, COUNT(*)::BIGINT \
    FROM assets a \
    WHERE a.has_original AND a.owner_id = $1";

/// Sum and count over the distinct items reachable by a collection. The
/// UNION deduplicates items linked both directly and through a group.
const COLLECTION_USAGE_SQL: &str = "\
    SELECT COALESCE(SUM(a.size_bytes), 0)::BIGINT, COUNT(*)::BIGINT \
    FROM assets a \
    WHERE a.has_original AND a.item_id IN ( \
        SELECT ic.item_id FROM item_collections ic WHERE ic.collection_id = $1 \
        UNION \
        SELECT ig.item_id FROM item_groups ig \
        JOIN group_collections gc ON gc.group_id = ig.group_id \
        WHERE gc.collection_id = $1 \
    )";

/// Direct assignments (path 0) precede group-derived ones (path 1).
const COLLECTIONS_FOR_ITEM_SQL: &str = "\
    SELECT collection_id, path FROM ( \
        SELECT ic.collection_id, 0 AS path FROM item_collections ic WHERE ic.item_id = $1 \
        UNION ALL \
        SELECT gc.collection_id, 1 AS path FROM item_groups ig \
        JOIN group_collections gc ON gc.group_id = ig.group_id \
        WHERE ig.item_id = $1 \
    ) paths \
    ORDER BY path ASC, collection_id ASC";

/// Repository reading the host asset inventory.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    /// Create a new inventory repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn tally(&self, sql: &str, id: Uuid, what: &str) -> AppResult<UsageTally> {
        let (bytes, assets): (i64, i64) = sqlx::query_as(sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to aggregate {what} usage"),
                    e,
                )
            })?;

        Ok(UsageTally::new(non_negative(bytes), non_negative(assets)))
    }
}

#[async_trait]
impl AssetInventory for InventoryRepository {
    async fn account_usage(&self, account_id: AccountId) -> AppResult<UsageTally> {
        self.tally(ACCOUNT_USAGE_SQL, account_id.into_uuid(), "account")
            .await
    }

    async fn collection_usage(&self, collection_id: CollectionId) -> AppResult<UsageTally> {
        self.tally(COLLECTION_USAGE_SQL, collection_id.into_uuid(), "collection")
            .await
    }

    async fn collections_for_item(&self, item_id: ItemId) -> AppResult<Vec<CollectionId>> {
        let rows: Vec<(Uuid, i32)> = sqlx::query_as(COLLECTIONS_FOR_ITEM_SQL)
            .bind(item_id.into_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to resolve item collections", e)
            })?;

        let mut collections: Vec<CollectionId> = Vec::with_capacity(rows.len());
        for (id, _) in rows {
            let id = CollectionId::from_uuid(id);
            if !collections.contains(&id) {
                collections.push(id);
            }
        }
        Ok(collections)
    }

    async fn health_check(&self) -> AppResult<bool> {
        ping(&self.pool).await
    }
}

/// Aggregates are never negative given the table CHECK constraints.
fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
