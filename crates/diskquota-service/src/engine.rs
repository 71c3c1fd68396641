//! Wiring of every quota service over one pair of collaborators.

use std::sync::Arc;

use diskquota_core::config::quota::QuotaConfig;
use diskquota_core::result::AppResult;
use diskquota_core::traits::{AssetInventory, SettingsStore};
use diskquota_entity::quota::QuotaDefaults;

use crate::admin::AdminService;
use crate::admission::{AdmissionController, ReservationLedger, ReservationSweeper, ScopeLocks};
use crate::policy::{DefaultsRegistry, PolicyResolver};
use crate::report::UsageReporter;
use crate::scope::ScopeResolver;
use crate::usage::UsageAggregator;

/// The assembled quota engine.
#[derive(Clone)]
pub struct QuotaEngine {
    /// Admission checks for the host pipeline.
    pub controller: AdmissionController,
    /// Usage reports.
    pub reporter: UsageReporter,
    /// Admin operations.
    pub admin: AdminService,
    /// Expired-reservation purge task.
    pub sweeper: ReservationSweeper,
    /// Shared process-wide defaults.
    pub defaults: DefaultsRegistry,
    settings: Arc<dyn SettingsStore>,
    inventory: Arc<dyn AssetInventory>,
}

impl std::fmt::Debug for QuotaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaEngine")
            .field("controller", &self.controller)
            .field("sweeper", &self.sweeper)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl QuotaEngine {
    /// Load defaults from the settings store (seeded by `config`) and
    /// build every service.
    pub async fn new(
        settings: Arc<dyn SettingsStore>,
        inventory: Arc<dyn AssetInventory>,
        config: &QuotaConfig,
    ) -> AppResult<Self> {
        config.validate()?;
        let seeds = QuotaDefaults::from_config(config);
        let defaults = DefaultsRegistry::load(settings.as_ref(), seeds).await?;
        Ok(Self::with_defaults(settings, inventory, config, defaults))
    }

    /// Build every service around an already loaded defaults registry.
    pub fn with_defaults(
        settings: Arc<dyn SettingsStore>,
        inventory: Arc<dyn AssetInventory>,
        config: &QuotaConfig,
        defaults: DefaultsRegistry,
    ) -> Self {
        let read_timeout = config.read_timeout();

        let usage = UsageAggregator::new(inventory.clone(), read_timeout);
        let policy = PolicyResolver::new(settings.clone(), defaults.clone(), read_timeout);
        let reporter = UsageReporter::new(usage.clone(), policy.clone());

        let ledger = Arc::new(ReservationLedger::new(config.reservation_ttl()));
        let locks = ScopeLocks::new();

        let controller = AdmissionController::new(
            ScopeResolver::new(inventory.clone(), read_timeout),
            usage,
            policy.clone(),
            ledger.clone(),
            locks.clone(),
        );
        let sweeper = ReservationSweeper::new(ledger, locks, config.sweep_interval());
        let admin = AdminService::new(settings.clone(), policy, reporter.clone());

        Self {
            controller,
            reporter,
            admin,
            sweeper,
            defaults,
            settings,
            inventory,
        }
    }

    /// Whether both collaborators answer.
    pub async fn health_check(&self) -> (bool, bool) {
        let settings = self.settings.health_check().await.unwrap_or(false);
        let inventory = self.inventory.health_check().await.unwrap_or(false);
        (settings, inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskquota_core::keys;
    use diskquota_core::types::id::AccountId;
    use diskquota_database::{MemoryInventory, MemorySettingsStore};
    use diskquota_entity::asset::PendingAsset;
    use diskquota_entity::units::mb_to_bytes;

    #[tokio::test]
    async fn test_engine_uses_persisted_defaults() {
        let settings = MemorySettingsStore::new();
        settings.set(keys::DEFAULT_ACCOUNT_MB, 1).await.unwrap();

        let engine = QuotaEngine::new(
            Arc::new(settings),
            Arc::new(MemoryInventory::new()),
            &QuotaConfig::default(),
        )
        .await
        .unwrap();

        let owner = AccountId::new();
        let admission = engine
            .controller
            .check(&PendingAsset::create(owner, None, mb_to_bytes(2)))
            .await
            .unwrap();
        assert!(!admission.is_admitted());
        assert_eq!(engine.health_check().await, (true, true));
    }

    #[tokio::test]
    async fn test_engine_debug_output() {
        let engine = QuotaEngine::new(
            Arc::new(MemorySettingsStore::new()),
            Arc::new(MemoryInventory::new()),
            &QuotaConfig::default(),
        )
        .await
        .unwrap();

        let rendered = format!("{engine:?}");
        assert!(rendered.starts_with("QuotaEngine"));
        assert!(rendered.contains("defaults"));
    }
}
