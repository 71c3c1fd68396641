//! Settings repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use diskquota_core::error::{AppError, ErrorKind};
use diskquota_core::result::AppResult;
use diskquota_core::traits::SettingsStore;

use crate::connection::ping;

const UPSERT_SQL: &str = "INSERT INTO settings (key, value, updated_at) VALUES ($1, $2, NOW()) \
     ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()";

/// Repository for persisted quota settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    /// Create a new settings repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for SettingsRepository {
    async fn get(&self, key: &str) -> AppResult<Option<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read setting", e))
    }

    async fn set(&self, key: &str, value: i64) -> AppResult<()> {
        if value < 0 {
            return Err(AppError::validation(format!(
                "Setting '{key}' must be non-negative, got {value}"
            )));
        }

        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write setting", e))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM settings WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete setting", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_many(&self, entries: &[(&str, i64)]) -> AppResult<()> {
        if let Some((key, value)) = entries.iter().find(|(_, value)| *value < 0) {
            return Err(AppError::validation(format!(
                "Setting '{key}' must be non-negative, got {value}"
            )));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin settings transaction", e)
        })?;
        for &(key, value) in entries {
            sqlx::query(UPSERT_SQL)
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to write setting", e)
                })?;
        }
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit settings", e)
        })?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        ping(&self.pool).await
    }
}
