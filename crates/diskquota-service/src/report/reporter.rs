//! Usage reporter: formats aggregator and policy output for display.

use tracing::debug;

use diskquota_core::result::AppResult;
use diskquota_entity::quota::UsageReport;
use diskquota_entity::scope::Scope;

use crate::policy::PolicyResolver;
use crate::usage::UsageAggregator;

/// Builds read-only usage reports.
///
/// Reports reflect committed inventory only; in-flight reservations are
/// not included, so repeated reports without intervening writes are
/// identical.
#[derive(Debug, Clone)]
pub struct UsageReporter {
    usage: UsageAggregator,
    policy: PolicyResolver,
}

impl UsageReporter {
    /// Creates a new usage reporter.
    pub fn new(usage: UsageAggregator, policy: PolicyResolver) -> Self {
        Self { usage, policy }
    }

    /// Report used, limit, percentage and warning state for `scope`.
    pub async fn report(&self, scope: Scope) -> AppResult<UsageReport> {
        let limit = self.policy.limit(scope).await?;
        let tally = self.usage.tally(scope).await?;
        let threshold = self
            .policy
            .defaults()
            .current()
            .await
            .warning_threshold_percent;

        let report = UsageReport::new(scope, tally, limit, threshold);
        debug!(
            scope = %scope,
            used_bytes = report.used_bytes,
            limit_bytes = report.limit_bytes,
            warn = report.warn,
            "Usage report built"
        );
        Ok(report)
    }
}
