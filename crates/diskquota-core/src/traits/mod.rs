//! Collaborator traits defined in `diskquota-core` and implemented by
//! `diskquota-database`.

pub mod inventory;
pub mod settings;

pub use inventory::{AssetInventory, UsageTally};
pub use settings::SettingsStore;
