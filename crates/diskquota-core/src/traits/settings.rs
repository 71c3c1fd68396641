//! Settings store trait for persisted quota overrides and defaults.

use async_trait::async_trait;

use crate::result::AppResult;

/// Key/value persistence for quota settings.
///
/// Keys are namespaced strings built by [`crate::keys`]; values are
/// non-negative integers. Writes are last-writer-wins. A batch written
/// through [`SettingsStore::set_many`] lands entirely or not at all.
#[async_trait]
pub trait SettingsStore: Send + Sync + 'static {
    /// Read a value. `None` means the key was never written.
    async fn get(&self, key: &str) -> AppResult<Option<i64>>;

    /// Insert or replace a value.
    async fn set(&self, key: &str, value: i64) -> AppResult<()>;

    /// Remove a value. Returns whether a value existed.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Write several values as one unit.
    ///
    /// The default writes sequentially and, on failure, restores every key
    /// already written to its previous value before returning the error.
    /// Stores with native transactions should override this.
    async fn set_many(&self, entries: &[(&str, i64)]) -> AppResult<()> {
        let mut previous = Vec::with_capacity(entries.len());
        for &(key, _) in entries {
            previous.push((key, self.get(key).await?));
        }

        for (written, &(key, value)) in entries.iter().enumerate() {
            if let Err(err) = self.set(key, value).await {
                for &(key, old) in previous.iter().take(written) {
                    // Best effort; the original error is what the caller needs.
                    let _ = match old {
                        Some(old) => self.set(key, old).await,
                        None => self.delete(key).await.map(|_| ()),
                    };
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
