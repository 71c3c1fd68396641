//! Quota limits, overrides, defaults and usage reports.

pub mod defaults;
pub mod limit;
pub mod overrides;
pub mod usage;

pub use defaults::QuotaDefaults;
pub use limit::QuotaLimit;
pub use overrides::QuotaOverride;
pub use usage::{UsageReport, UsageState};
