//! Admission decisions handed back to the host pipeline.

pub mod decision;
pub mod rejection;

pub use decision::{AdmissionDecision, CheckOutcome, ScopeCheck, SkipReason};
pub use rejection::QuotaRejection;
