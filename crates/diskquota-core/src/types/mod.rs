//! Core type definitions used across the DiskQuota workspace.

pub mod id;

pub use id::*;
