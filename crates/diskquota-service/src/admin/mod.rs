//! Administrative operations on quota settings.

pub mod service;

pub use service::{AdminService, DefaultsUpdate};
