//! Quota policy: overrides, defaults and effective limits.

pub mod defaults;
pub mod resolver;

pub use defaults::DefaultsRegistry;
pub use resolver::{EffectiveLimit, LimitSource, PolicyResolver};
