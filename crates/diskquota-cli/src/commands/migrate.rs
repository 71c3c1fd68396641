//! Database migration command.

use crate::output;
use diskquota_core::config::DatabaseBackend;
use diskquota_core::error::AppError;
use diskquota_database::DatabasePool;
use diskquota_database::migration::run_migrations;

/// Apply all pending migrations to the configured database.
pub async fn execute(config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    if config.database.backend == DatabaseBackend::Memory {
        output::print_warning("The memory backend has no schema; nothing to migrate");
        return Ok(());
    }

    let pool = DatabasePool::connect(&config.database).await?;
    println!("Running database migrations...");
    let result = run_migrations(pool.pool()).await;
    pool.close().await;
    result?;

    output::print_success("Migrations completed successfully");
    Ok(())
}
