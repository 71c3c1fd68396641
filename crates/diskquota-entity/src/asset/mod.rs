//! Inventoried assets and pending writes.

pub mod model;
pub mod pending;

pub use model::Asset;
pub use pending::{AssetOperation, PendingAsset};
