//! Availability and latency toggles shared by the in-memory stores.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use diskquota_core::error::AppError;
use diskquota_core::result::AppResult;

/// Injectable failure modes for an in-memory store.
#[derive(Debug)]
pub struct FaultSwitch {
    name: &'static str,
    available: AtomicBool,
    latency_ms: AtomicU64,
}

impl FaultSwitch {
    /// Create a healthy switch for the named store.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            available: AtomicBool::new(true),
            latency_ms: AtomicU64::new(0),
        }
    }

    /// Make subsequent calls fail with a service-unavailable error.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Delay every subsequent call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(ms, Ordering::SeqCst);
    }

    /// Apply the configured latency, then fail if the store is down.
    pub async fn enter(&self) -> AppResult<()> {
        let ms = self.latency_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::service_unavailable(format!(
                "{} is unavailable",
                self.name
            )))
        }
    }
}
