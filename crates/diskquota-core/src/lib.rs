//! # diskquota-core
//!
//! Core crate for DiskQuota. Contains the collaborator traits (settings
//! store, asset inventory), configuration schemas, typed identifiers,
//! settings key builders, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DiskQuota crates.

pub mod config;
pub mod error;
pub mod keys;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
