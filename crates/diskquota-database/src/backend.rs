//! Backend selection from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use diskquota_core::config::{DatabaseBackend, DatabaseConfig};
use diskquota_core::result::AppResult;
use diskquota_core::traits::{AssetInventory, SettingsStore};

use crate::connection::DatabasePool;
use crate::memory::{MemoryInventory, MemorySettingsStore};
use crate::migration::run_migrations;
use crate::repositories::{InventoryRepository, SettingsRepository};

/// The collaborators the quota engine runs on.
#[derive(Clone)]
pub struct Backends {
    /// Settings store holding overrides and defaults.
    pub settings: Arc<dyn SettingsStore>,
    /// Asset inventory.
    pub inventory: Arc<dyn AssetInventory>,
    /// PostgreSQL pool when the postgres backend is selected.
    pub pool: Option<DatabasePool>,
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("pool", &self.pool)
            .finish()
    }
}

impl Backends {
    /// Fresh in-memory backends.
    pub fn memory() -> Self {
        Self {
            settings: Arc::new(MemorySettingsStore::new()),
            inventory: Arc::new(MemoryInventory::new()),
            pool: None,
        }
    }

    /// Connect the backend selected by `config`, optionally applying
    /// pending migrations first.
    pub async fn connect(config: &DatabaseConfig, migrate: bool) -> AppResult<Self> {
        match config.backend {
            DatabaseBackend::Memory => {
                warn!(
                    "Using in-memory backends: settings are not persisted and the asset \
                     inventory starts empty; committed uploads are not recorded, so quotas \
                     only count in-flight reservations"
                );
                Ok(Self::memory())
            }
            DatabaseBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if migrate {
                    run_migrations(pool.pool()).await?;
                }
                info!("PostgreSQL backends ready");

                Ok(Self {
                    settings: Arc::new(SettingsRepository::new(pool.pool().clone())),
                    inventory: Arc::new(InventoryRepository::new(pool.pool().clone())),
                    pool: Some(pool),
                })
            }
        }
    }

    /// Close the PostgreSQL pool, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
