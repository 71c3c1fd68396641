//! In-memory settings store backed by a concurrent map.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use diskquota_core::error::AppError;
use diskquota_core::result::AppResult;
use diskquota_core::traits::SettingsStore;

use super::faults::FaultSwitch;

/// Settings store holding values in a [`DashMap`].
#[derive(Debug, Clone)]
pub struct MemorySettingsStore {
    values: Arc<DashMap<String, i64>>,
    faults: Arc<FaultSwitch>,
}

impl MemorySettingsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            values: Arc::new(DashMap::new()),
            faults: Arc::new(FaultSwitch::new("settings store")),
        }
    }

    /// Failure toggles for this store.
    pub fn faults(&self) -> &FaultSwitch {
        &self.faults
    }

    /// Write a raw value, bypassing validation. Lets tests plant corrupt
    /// rows such as negative limits.
    pub fn insert_raw(&self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> AppResult<Option<i64>> {
        self.faults.enter().await?;
        Ok(self.values.get(key).map(|v| *v))
    }

    async fn set(&self, key: &str, value: i64) -> AppResult<()> {
        self.faults.enter().await?;
        if value < 0 {
            return Err(AppError::validation(format!(
                "Setting '{key}' must be non-negative, got {value}"
            )));
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        self.faults.enter().await?;
        Ok(self.values.remove(key).is_some())
    }

    async fn set_many(&self, entries: &[(&str, i64)]) -> AppResult<()> {
        self.faults.enter().await?;
        if let Some((key, value)) = entries.iter().find(|(_, value)| *value < 0) {
            return Err(AppError::validation(format!(
                "Setting '{key}' must be non-negative, got {value}"
            )));
        }
        for &(key, value) in entries {
            self.values.insert(key.to_string(), value);
        }
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.faults.enter().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskquota_core::error::ErrorKind;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", 10).await.unwrap();
        store.set("k", 20).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(20));

        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_negative_values_rejected() {
        let store = MemorySettingsStore::new();
        let err = store.set("k", -1).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_set_many_rejects_whole_batch() {
        let store = MemorySettingsStore::new();
        let err = store.set_many(&[("a", 1), ("b", -1)]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(store.is_empty());

        store.set_many(&[("a", 1), ("b", 2)]).await.unwrap();
        assert_eq!(store.get("b").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_transiently() {
        let store = MemorySettingsStore::new();
        store.faults().set_available(false);
        let err = store.get("k").await.unwrap_err();
        assert!(err.is_transient());
        assert!(store.health_check().await.is_err());

        store.faults().set_available(true);
        assert!(store.health_check().await.unwrap());
    }
}
