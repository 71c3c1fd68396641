//! Process-local collaborator backends.
//!
//! Used when `database.backend = "memory"` and throughout the test
//! suites. Both stores can be switched unavailable or slowed down to
//! exercise fail-open admission.

pub mod faults;
pub mod inventory;
pub mod settings;

pub use faults::FaultSwitch;
pub use inventory::MemoryInventory;
pub use settings::MemorySettingsStore;
