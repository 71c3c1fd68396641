//! Background purge of expired reservations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info};

use super::ledger::ReservationLedger;
use super::locks::ScopeLocks;

/// Periodically removes expired reservations and idle scope locks.
#[derive(Debug, Clone)]
pub struct ReservationSweeper {
    ledger: Arc<ReservationLedger>,
    locks: ScopeLocks,
    interval: Duration,
}

impl ReservationSweeper {
    /// Creates a new sweeper.
    pub fn new(ledger: Arc<ReservationLedger>, locks: ScopeLocks, interval: Duration) -> Self {
        Self {
            ledger,
            locks,
            interval,
        }
    }

    /// Run one sweep. Returns the number of expired reservations removed.
    pub fn sweep(&self) -> usize {
        let expired = self.ledger.sweep_expired();
        let idle_locks = self.locks.prune();

        if expired > 0 {
            info!(expired = expired, "Expired reservations purged");
        }
        debug!(
            expired = expired,
            idle_locks = idle_locks,
            live = self.ledger.len(),
            "Reservation sweep completed"
        );
        expired
    }

    /// Sweep every interval until the shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_seconds = self.interval.as_secs(),
            "Reservation sweeper started"
        );

        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.sweep();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Reservation sweeper shutting down");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use diskquota_core::types::id::AccountId;
    use diskquota_entity::scope::Scope;

    #[tokio::test(start_paused = true)]
    async fn test_run_purges_and_stops() {
        let ledger = Arc::new(ReservationLedger::new(Duration::from_secs(5)));
        let sweeper = ReservationSweeper::new(ledger.clone(), ScopeLocks::new(), Duration::from_secs(1));
        ledger.reserve(vec![Scope::Account(AccountId::new())], 10);

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn({
            let sweeper = sweeper.clone();
            async move { sweeper.run(rx).await }
        });

        time::sleep(Duration::from_secs(7)).await;
        assert!(ledger.is_empty());

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweep_keeps_live_reservations() {
        let ledger = Arc::new(ReservationLedger::new(Duration::from_secs(60)));
        let sweeper = ReservationSweeper::new(ledger.clone(), ScopeLocks::new(), Duration::from_secs(1));
        ledger.reserve(vec![Scope::Account(AccountId::new())], 10);

        assert_eq!(sweeper.sweep(), 0);
        assert_eq!(ledger.len(), 1);
    }
}
