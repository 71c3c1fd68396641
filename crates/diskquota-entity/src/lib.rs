//! # diskquota-entity
//!
//! Domain value objects for DiskQuota. Scopes are views over host-owned
//! accounts and collections; none of these types is persisted by the
//! engine itself except through the settings store.

pub mod admission;
pub mod asset;
pub mod quota;
pub mod scope;
pub mod units;
