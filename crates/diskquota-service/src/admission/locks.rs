//! Per-scope serialization points for check-and-reserve.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use diskquota_entity::scope::Scope;

/// Async mutexes keyed by scope.
///
/// Unrelated scopes never contend. Callers holding several scopes lock
/// them in [`Scope`] order, so two writes sharing scopes cannot deadlock.
#[derive(Debug, Clone, Default)]
pub struct ScopeLocks {
    locks: Arc<DashMap<Scope, Arc<Mutex<()>>>>,
}

impl ScopeLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every scope in `scopes`, in canonical order.
    pub async fn lock_all(&self, scopes: &[Scope]) -> Vec<OwnedMutexGuard<()>> {
        let mut ordered = scopes.to_vec();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for scope in ordered {
            let lock = self.locks.entry(scope).or_default().clone();
            guards.push(lock.lock_owned().await);
        }
        guards
    }

    /// Drop lock entries nobody holds or waits on.
    pub fn prune(&self) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before.saturating_sub(self.locks.len())
    }

    /// Number of tracked scopes.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no scope is tracked.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
