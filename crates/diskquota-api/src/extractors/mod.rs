//! Custom Axum extractors.

pub mod admin;
pub mod json;
pub mod path;

pub use admin::AdminAccess;
pub use json::ValidatedJson;
pub use path::{ScopePath, parse_reservation_id};
