//! Shared, explicitly passed registry of process-wide defaults.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use diskquota_core::error::AppError;
use diskquota_core::keys;
use diskquota_core::result::AppResult;
use diskquota_core::traits::SettingsStore;
use diskquota_entity::quota::QuotaDefaults;
use diskquota_entity::quota::defaults::validate_threshold;

/// Holds the current [`QuotaDefaults`].
///
/// Loaded once at startup; replaced only through the admin path.
#[derive(Debug, Clone)]
pub struct DefaultsRegistry {
    inner: Arc<RwLock<QuotaDefaults>>,
}

impl DefaultsRegistry {
    /// Registry holding `defaults` as-is.
    pub fn new(defaults: QuotaDefaults) -> Self {
        Self {
            inner: Arc::new(RwLock::new(defaults)),
        }
    }

    /// Load persisted defaults, falling back to `seeds` for missing keys.
    pub async fn load(settings: &dyn SettingsStore, seeds: QuotaDefaults) -> AppResult<Self> {
        seeds.validate()?;

        let account_mb = load_mb(settings, keys::DEFAULT_ACCOUNT_MB, seeds.account_mb).await?;
        let collection_mb =
            load_mb(settings, keys::DEFAULT_COLLECTION_MB, seeds.collection_mb).await?;
        let global_mb = load_mb(settings, keys::DEFAULT_GLOBAL_MB, seeds.global_mb).await?;

        let warning_threshold_percent = match settings.get(keys::WARNING_THRESHOLD_PERCENT).await? {
            Some(stored) => validate_threshold(stored).map_err(|e| {
                AppError::configuration(format!(
                    "Stored warning threshold is invalid: {}",
                    e.message
                ))
            })?,
            None => seeds.warning_threshold_percent,
        };

        let defaults = QuotaDefaults {
            account_mb,
            collection_mb,
            global_mb,
            warning_threshold_percent,
        };

        info!(
            account_mb = defaults.account_mb,
            collection_mb = defaults.collection_mb,
            global_mb = defaults.global_mb,
            warning_threshold_percent = defaults.warning_threshold_percent,
            "Quota defaults loaded"
        );

        Ok(Self::new(defaults))
    }

    /// Snapshot of the current defaults.
    pub async fn current(&self) -> QuotaDefaults {
        *self.inner.read().await
    }

    /// Swap in new defaults.
    pub async fn replace(&self, defaults: QuotaDefaults) {
        *self.inner.write().await = defaults;
    }
}

async fn load_mb(settings: &dyn SettingsStore, key: &str, seed: u64) -> AppResult<u64> {
    match settings.get(key).await? {
        Some(stored) => u64::try_from(stored).map_err(|_| {
            AppError::configuration(format!("Stored default '{key}' is negative ({stored} MB)"))
        }),
        None => {
            warn!(key = key, seed = seed, "Default not persisted, using configured seed");
            Ok(seed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskquota_core::error::ErrorKind;
    use diskquota_database::MemorySettingsStore;

    #[tokio::test]
    async fn test_load_falls_back_to_seeds() {
        let store = MemorySettingsStore::new();
        store.set(keys::DEFAULT_ACCOUNT_MB, 250).await.unwrap();

        let registry = DefaultsRegistry::load(&store, QuotaDefaults::default())
            .await
            .unwrap();
        let defaults = registry.current().await;
        assert_eq!(defaults.account_mb, 250);
        assert_eq!(defaults.collection_mb, 1000);
        assert_eq!(defaults.warning_threshold_percent, 15);
    }

    #[tokio::test]
    async fn test_negative_stored_default_is_configuration_error() {
        let store = MemorySettingsStore::new();
        store.insert_raw(keys::DEFAULT_COLLECTION_MB, -1);

        let err = DefaultsRegistry::load(&store, QuotaDefaults::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_invalid_stored_threshold_is_configuration_error() {
        let store = MemorySettingsStore::new();
        store.set(keys::WARNING_THRESHOLD_PERCENT, 80).await.unwrap();

        let err = DefaultsRegistry::load(&store, QuotaDefaults::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_replace_is_visible_to_clones() {
        let registry = DefaultsRegistry::new(QuotaDefaults::default());
        let clone = registry.clone();
        registry
            .replace(QuotaDefaults {
                account_mb: 1,
                ..QuotaDefaults::default()
            })
            .await;
        assert_eq!(clone.current().await.account_mb, 1);
    }
}
