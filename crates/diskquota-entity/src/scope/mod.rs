//! Quota scopes.

pub mod kind;
pub mod model;

pub use kind::ScopeKind;
pub use model::Scope;
