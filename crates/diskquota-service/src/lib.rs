//! # diskquota-service
//!
//! Quota accounting and admission control. Each service is constructed
//! with its collaborators as `Arc<dyn Trait>` references; [`QuotaEngine`]
//! wires them together from configuration.

pub mod admin;
pub mod admission;
pub mod context;
mod deadline;
pub mod engine;
pub mod policy;
pub mod report;
pub mod scope;
pub mod usage;

pub use admin::{AdminService, DefaultsUpdate};
pub use admission::{
    Admission, AdmissionController, AdmissionTicket, ReservationLedger, ReservationSweeper,
    ScopeLocks,
};
pub use context::AdminContext;
pub use engine::QuotaEngine;
pub use policy::{DefaultsRegistry, EffectiveLimit, LimitSource, PolicyResolver};
pub use report::UsageReporter;
pub use scope::ScopeResolver;
pub use usage::{Usage, UsageAggregator};
