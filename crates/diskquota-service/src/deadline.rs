//! Bounded collaborator reads.

use std::future::Future;
use std::time::Duration;

use diskquota_core::error::AppError;
use diskquota_core::result::AppResult;

/// Await `read`, failing with a timeout error after `limit`.
pub(crate) async fn within<T, F>(limit: Duration, what: &str, read: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(limit, read).await.map_err(|_| {
        AppError::timeout(format!(
            "{what} did not complete within {} ms",
            limit.as_millis()
        ))
    })?
}
