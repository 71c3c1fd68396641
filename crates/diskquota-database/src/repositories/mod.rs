//! PostgreSQL implementations of the collaborator traits.

pub mod inventory;
pub mod settings;

pub use inventory::InventoryRepository;
pub use settings::SettingsRepository;
