//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use diskquota_core::types::id::{AccountId, ItemId};
use diskquota_entity::asset::{AssetOperation, PendingAsset};
use diskquota_service::DefaultsUpdate;

/// Admission check request from the upload pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdmissionRequest {
    /// Account that will own the asset.
    pub owner_id: Uuid,
    /// Item the asset is attached to, if any.
    #[serde(default)]
    pub item_id: Option<Uuid>,
    /// Size of the asset in bytes (0 = unknown).
    #[validate(range(min = 0, message = "size_bytes must be non-negative"))]
    pub size_bytes: i64,
    /// Write kind; defaults to create.
    #[serde(default)]
    pub operation: AssetOperation,
}

impl AdmissionRequest {
    /// Convert into the engine's pending-write value.
    pub fn into_pending(self) -> PendingAsset {
        PendingAsset {
            owner_id: AccountId::from_uuid(self.owner_id),
            item_id: self.item_id.map(ItemId::from_uuid),
            size_bytes: u64::try_from(self.size_bytes).unwrap_or(0),
            operation: self.operation,
        }
    }
}

/// Set a per-scope quota override.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetQuotaRequest {
    /// Limit in MB; 0 means unlimited.
    #[validate(range(min = 0, message = "limit_mb must be zero (unlimited) or positive"))]
    pub limit_mb: i64,
}

/// Update the process-wide defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDefaultsRequest {
    /// Default account quota in MB.
    #[validate(range(min = 0))]
    pub account_mb: i64,
    /// Default collection quota in MB.
    #[validate(range(min = 0))]
    pub collection_mb: i64,
    /// Global quota in MB (not enforced).
    #[validate(range(min = 0))]
    pub global_mb: i64,
    /// Warning threshold percentage.
    #[validate(range(min = 1, max = 50))]
    pub warning_threshold_percent: i64,
}

impl From<UpdateDefaultsRequest> for DefaultsUpdate {
    fn from(req: UpdateDefaultsRequest) -> Self {
        Self {
            account_mb: req.account_mb,
            collection_mb: req.collection_mb,
            global_mb: req.global_mb,
            warning_threshold_percent: req.warning_threshold_percent,
        }
    }
}
