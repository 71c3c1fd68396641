//! Effective limit resolution.
//!
//! Resolution order:
//! 1. Per-scope override from the settings store
//! 2. Default for the scope kind
//!
//! A resolved value of zero means unlimited.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::error;

use diskquota_core::error::ErrorKind;
use diskquota_core::result::AppResult;
use diskquota_core::traits::SettingsStore;
use diskquota_entity::quota::{QuotaLimit, QuotaOverride};
use diskquota_entity::scope::Scope;

use super::defaults::DefaultsRegistry;
use crate::deadline;

/// Where an effective limit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitSource {
    /// An explicit per-scope override.
    Override,
    /// The default for the scope kind.
    Default,
}

/// A resolved limit together with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveLimit {
    /// The scope the limit applies to.
    pub scope: Scope,
    /// Limit in whole MB (0 = unlimited).
    pub limit_mb: u64,
    /// Limit in bytes (0 = unlimited).
    pub limit_bytes: u64,
    /// Whether the limit is unlimited.
    pub unlimited: bool,
    /// Origin of the value.
    pub source: LimitSource,
}

impl EffectiveLimit {
    fn new(scope: Scope, limit_mb: u64, source: LimitSource) -> Self {
        let limit = QuotaLimit::from_mb(limit_mb);
        Self {
            scope,
            limit_mb,
            limit_bytes: limit.bytes(),
            unlimited: limit.is_unlimited(),
            source,
        }
    }

    /// The limit as a [`QuotaLimit`].
    pub fn limit(&self) -> QuotaLimit {
        QuotaLimit::from_mb(self.limit_mb)
    }
}

/// Resolves the effective limit for a scope.
#[derive(Clone)]
pub struct PolicyResolver {
    settings: Arc<dyn SettingsStore>,
    defaults: DefaultsRegistry,
    read_timeout: Duration,
}

impl std::fmt::Debug for PolicyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyResolver")
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl PolicyResolver {
    /// Creates a new policy resolver.
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        defaults: DefaultsRegistry,
        read_timeout: Duration,
    ) -> Self {
        Self {
            settings,
            defaults,
            read_timeout,
        }
    }

    /// Read the explicit override for `scope`, if any.
    ///
    /// A negative stored value surfaces as a configuration error.
    pub async fn override_for(&self, scope: Scope) -> AppResult<Option<QuotaOverride>> {
        let key = scope.override_key();
        let stored =
            deadline::within(self.read_timeout, "Override read", self.settings.get(&key)).await?;

        stored
            .map(|value| QuotaOverride::from_stored(scope, value))
            .transpose()
            .inspect_err(|e| {
                if e.kind == ErrorKind::Configuration {
                    error!(scope = %scope, key = %key, error = %e, "Corrupt quota override");
                }
            })
    }

    /// Resolve the effective limit and its origin.
    pub async fn effective(&self, scope: Scope) -> AppResult<EffectiveLimit> {
        if let Some(ov) = self.override_for(scope).await? {
            return Ok(EffectiveLimit::new(scope, ov.limit_mb, LimitSource::Override));
        }

        let defaults = self.defaults.current().await;
        Ok(EffectiveLimit::new(
            scope,
            defaults.mb_for(scope.kind()),
            LimitSource::Default,
        ))
    }

    /// Resolve the effective limit.
    pub async fn limit(&self, scope: Scope) -> AppResult<QuotaLimit> {
        Ok(self.effective(scope).await?.limit())
    }

    /// The shared defaults registry.
    pub fn defaults(&self) -> &DefaultsRegistry {
        &self.defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskquota_core::types::id::{AccountId, CollectionId};
    use diskquota_database::MemorySettingsStore;
    use diskquota_entity::quota::QuotaDefaults;
    use diskquota_entity::units::mb_to_bytes;

    fn resolver(store: &MemorySettingsStore) -> PolicyResolver {
        PolicyResolver::new(
            Arc::new(store.clone()),
            DefaultsRegistry::new(QuotaDefaults::default()),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_default_applies_without_override() {
        let store = MemorySettingsStore::new();
        let policy = resolver(&store);

        let account = policy.effective(Scope::Account(AccountId::new())).await.unwrap();
        assert_eq!(account.limit_mb, 500);
        assert_eq!(account.source, LimitSource::Default);

        let collection = policy
            .limit(Scope::Collection(CollectionId::new()))
            .await
            .unwrap();
        assert_eq!(collection.bytes(), mb_to_bytes(1000));
    }

    #[tokio::test]
    async fn test_zero_override_means_unlimited() {
        let store = MemorySettingsStore::new();
        let scope = Scope::Account(AccountId::new());
        store.set(&scope.override_key(), 0).await.unwrap();

        let effective = resolver(&store).effective(scope).await.unwrap();
        assert!(effective.unlimited);
        assert_eq!(effective.limit_bytes, 0);
        assert_eq!(effective.source, LimitSource::Override);
    }

    #[tokio::test]
    async fn test_override_wins_over_default() {
        let store = MemorySettingsStore::new();
        let scope = Scope::Collection(CollectionId::new());
        store.set(&scope.override_key(), 42).await.unwrap();

        let limit = resolver(&store).limit(scope).await.unwrap();
        assert_eq!(limit.mb(), 42);
    }

    #[tokio::test]
    async fn test_negative_stored_override_is_configuration_error() {
        let store = MemorySettingsStore::new();
        let scope = Scope::Account(AccountId::new());
        store.insert_raw(&scope.override_key(), -10);

        let err = resolver(&store).limit(scope).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = MemorySettingsStore::new();
        store.faults().set_available(false);

        let err = resolver(&store)
            .limit(Scope::Account(AccountId::new()))
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }
}
