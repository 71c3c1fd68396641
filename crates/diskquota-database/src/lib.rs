//! # diskquota-database
//!
//! Collaborator backends for DiskQuota: the PostgreSQL connection pool and
//! repositories implementing [`SettingsStore`] and [`AssetInventory`], plus
//! process-local in-memory equivalents used for single-node runs and tests.
//!
//! [`SettingsStore`]: diskquota_core::traits::SettingsStore
//! [`AssetInventory`]: diskquota_core::traits::AssetInventory

pub mod backend;
pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use backend::Backends;
pub use connection::DatabasePool;
pub use memory::{MemoryInventory, MemorySettingsStore};
pub use repositories::{InventoryRepository, SettingsRepository};
