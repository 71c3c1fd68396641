//! Admin service: overrides, defaults and read-only quota views.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use diskquota_core::keys;
use diskquota_core::result::AppResult;
use diskquota_core::traits::SettingsStore;
use diskquota_entity::quota::defaults::validate_threshold;
use diskquota_entity::quota::overrides::validate_mb;
use diskquota_entity::quota::{QuotaDefaults, QuotaOverride, UsageReport};
use diskquota_entity::scope::Scope;

use crate::context::AdminContext;
use crate::policy::{EffectiveLimit, PolicyResolver};
use crate::report::UsageReporter;

/// Submitted defaults form. Values are signed so negative input can be
/// rejected instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsUpdate {
    /// Default account quota in MB.
    pub account_mb: i64,
    /// Default collection quota in MB.
    pub collection_mb: i64,
    /// Global quota in MB (stored, not enforced).
    pub global_mb: i64,
    /// Warning threshold percentage, 1..=50.
    pub warning_threshold_percent: i64,
}

impl DefaultsUpdate {
    /// Validate every field and build the resulting defaults.
    pub fn validate(&self) -> AppResult<QuotaDefaults> {
        Ok(QuotaDefaults {
            account_mb: validate_mb(self.account_mb, "Default account quota")?,
            collection_mb: validate_mb(self.collection_mb, "Default collection quota")?,
            global_mb: validate_mb(self.global_mb, "Global quota")?,
            warning_threshold_percent: validate_threshold(self.warning_threshold_percent)?,
        })
    }
}

/// Admin-facing quota operations.
#[derive(Clone)]
pub struct AdminService {
    settings: Arc<dyn SettingsStore>,
    policy: PolicyResolver,
    reporter: UsageReporter,
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService").finish()
    }
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        policy: PolicyResolver,
        reporter: UsageReporter,
    ) -> Self {
        Self {
            settings,
            policy,
            reporter,
        }
    }

    /// Set an explicit limit for a scope. Zero means unlimited.
    pub async fn set_override(
        &self,
        ctx: &AdminContext,
        scope: Scope,
        limit_mb: i64,
    ) -> AppResult<QuotaOverride> {
        ctx.require_authorized()?;
        let ov = QuotaOverride::new(scope, limit_mb)?;

        // Range-checked by QuotaOverride::new.
        self.settings
            .set(&scope.override_key(), limit_mb)
            .await?;

        info!(actor = %ctx.actor, scope = %scope, limit_mb = ov.limit_mb, "Quota override set");
        Ok(ov)
    }

    /// Remove a scope's override, reverting it to the kind default.
    /// Returns whether an override existed.
    pub async fn remove_override(&self, ctx: &AdminContext, scope: Scope) -> AppResult<bool> {
        ctx.require_authorized()?;
        let removed = self.settings.delete(&scope.override_key()).await?;

        info!(actor = %ctx.actor, scope = %scope, removed = removed, "Quota override removed");
        Ok(removed)
    }

    /// The effective limit for a scope and where it came from.
    pub async fn get_effective_limit(&self, scope: Scope) -> AppResult<EffectiveLimit> {
        self.policy.effective(scope).await
    }

    /// Current usage report for a scope.
    pub async fn get_usage_report(&self, scope: Scope) -> AppResult<UsageReport> {
        self.reporter.report(scope).await
    }

    /// Current process-wide defaults.
    pub async fn get_defaults(&self) -> QuotaDefaults {
        self.policy.defaults().current().await
    }

    /// Validate, persist and apply new defaults.
    ///
    /// Nothing is written unless every field is valid. The shared
    /// defaults are swapped only after all keys are persisted.
    pub async fn update_defaults(
        &self,
        ctx: &AdminContext,
        update: DefaultsUpdate,
    ) -> AppResult<QuotaDefaults> {
        ctx.require_authorized()?;
        let defaults = update.validate()?;

        self.settings
            .set_many(&[
                (keys::DEFAULT_ACCOUNT_MB, update.account_mb),
                (keys::DEFAULT_COLLECTION_MB, update.collection_mb),
                (keys::DEFAULT_GLOBAL_MB, update.global_mb),
                (keys::WARNING_THRESHOLD_PERCENT, update.warning_threshold_percent),
            ])
            .await?;

        self.policy.defaults().replace(defaults).await;

        info!(
            actor = %ctx.actor,
            account_mb = defaults.account_mb,
            collection_mb = defaults.collection_mb,
            global_mb = defaults.global_mb,
            warning_threshold_percent = defaults.warning_threshold_percent,
            "Quota defaults updated"
        );
        Ok(defaults)
    }
}
