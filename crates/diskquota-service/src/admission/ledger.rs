//! In-process ledger of admitted-but-uncommitted bytes.
//!
//! Every admitted write with a finite limit holds a reservation until the
//! host commits or aborts it. Reserved bytes count toward usage for later
//! checks against the same scope. Reservations expire after a TTL so an
//! abandoned write can never hold capacity forever.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use diskquota_core::types::id::ReservationId;
use diskquota_entity::scope::Scope;

/// Capacity held for one admitted write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Reservation identifier.
    pub id: ReservationId,
    /// Scopes the bytes are charged to.
    pub scopes: Vec<Scope>,
    /// Reserved bytes.
    pub bytes: u64,
    /// When the reservation stops counting.
    pub expires_at: Instant,
}

impl Reservation {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    reservations: HashMap<ReservationId, Reservation>,
    by_scope: HashMap<Scope, HashSet<ReservationId>>,
}

impl LedgerState {
    fn remove(&mut self, id: ReservationId) -> Option<Reservation> {
        let reservation = self.reservations.remove(&id)?;
        for scope in &reservation.scopes {
            if let Some(ids) = self.by_scope.get_mut(scope) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.by_scope.remove(scope);
                }
            }
        }
        Some(reservation)
    }
}

/// Reservation ledger shared by the admission controller and the sweeper.
#[derive(Debug)]
pub struct ReservationLedger {
    state: Mutex<LedgerState>,
    ttl: Duration,
}

impl ReservationLedger {
    /// Creates an empty ledger whose reservations live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // Critical sections never panic midway, so a poisoned state is
        // still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `bytes` against every scope in `scopes`.
    pub fn reserve(&self, scopes: Vec<Scope>, bytes: u64) -> ReservationId {
        let id = ReservationId::new();
        let expires_at = Instant::now() + self.ttl;
        let mut state = self.lock();

        for scope in &scopes {
            state.by_scope.entry(*scope).or_default().insert(id);
        }
        debug!(reservation_id = %id, bytes = bytes, scopes = scopes.len(), "Reservation recorded");
        state.reservations.insert(
            id,
            Reservation {
                id,
                scopes,
                bytes,
                expires_at,
            },
        );

        id
    }

    /// Bytes currently reserved against `scope`, ignoring expired entries.
    pub fn reserved_for(&self, scope: Scope) -> u64 {
        let now = Instant::now();
        let state = self.lock();

        state
            .by_scope
            .get(&scope)
            .into_iter()
            .flatten()
            .filter_map(|id| state.reservations.get(id))
            .filter(|r| !r.is_expired(now))
            .fold(0u64, |acc, r| acc.saturating_add(r.bytes))
    }

    /// Remove a reservation. Returns it if it existed and had not expired.
    pub fn release(&self, id: ReservationId) -> Option<Reservation> {
        let now = Instant::now();
        let removed = self.lock().remove(id)?;

        if removed.is_expired(now) {
            debug!(reservation_id = %id, "Released reservation had already expired");
            None
        } else {
            debug!(reservation_id = %id, bytes = removed.bytes, "Reservation released");
            Some(removed)
        }
    }

    /// Purge expired reservations. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.lock();

        let expired: Vec<ReservationId> = state
            .reservations
            .values()
            .filter(|r| r.is_expired(now))
            .map(|r| r.id)
            .collect();

        for id in &expired {
            state.remove(*id);
        }
        expired.len()
    }

    /// Number of reservations held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.lock().reservations.len()
    }

    /// Whether the ledger holds no reservations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured reservation lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
