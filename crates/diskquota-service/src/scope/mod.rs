//! Scope resolution for pending writes.

pub mod resolver;

pub use resolver::ScopeResolver;
