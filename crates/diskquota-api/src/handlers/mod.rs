//! HTTP handlers grouped by resource.

pub mod admin;
pub mod admission;
pub mod health;
pub mod quota;
