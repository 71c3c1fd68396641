//! Usage reporting for operators.

pub mod reporter;

pub use reporter::UsageReporter;
