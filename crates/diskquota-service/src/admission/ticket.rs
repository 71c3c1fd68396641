//! RAII handle for an admitted write's reservation.

use std::sync::Arc;

use tracing::debug;

use diskquota_core::types::id::ReservationId;

use super::ledger::ReservationLedger;

/// Holds a reservation until the write is committed or aborted.
///
/// Dropping an unresolved ticket aborts it, so a cancelled request
/// releases its capacity immediately.
#[derive(Debug)]
#[must_use = "dropping the ticket aborts the reservation"]
pub struct AdmissionTicket {
    reservation_id: ReservationId,
    ledger: Arc<ReservationLedger>,
    resolved: bool,
}

impl AdmissionTicket {
    pub(crate) fn new(reservation_id: ReservationId, ledger: Arc<ReservationLedger>) -> Self {
        Self {
            reservation_id,
            ledger,
            resolved: false,
        }
    }

    /// The reservation this ticket holds.
    pub fn reservation_id(&self) -> ReservationId {
        self.reservation_id
    }

    /// The write was durably persisted; release the reservation since the
    /// inventory now accounts for the bytes. Returns whether the
    /// reservation was still live.
    pub fn commit(mut self) -> bool {
        self.resolved = true;
        let live = self.ledger.release(self.reservation_id).is_some();
        debug!(reservation_id = %self.reservation_id, live = live, "Admission committed");
        live
    }

    /// The write was abandoned; release the reservation.
    pub fn abort(mut self) -> bool {
        self.resolved = true;
        let live = self.ledger.release(self.reservation_id).is_some();
        debug!(reservation_id = %self.reservation_id, live = live, "Admission aborted");
        live
    }

    /// Keep the reservation alive under its TTL for a later commit or
    /// abort by id.
    pub fn detach(mut self) -> ReservationId {
        self.resolved = true;
        self.reservation_id
    }
}

impl Drop for AdmissionTicket {
    fn drop(&mut self) {
        if !self.resolved {
            self.ledger.release(self.reservation_id);
            debug!(reservation_id = %self.reservation_id, "Unresolved admission dropped, reservation released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use diskquota_core::types::id::AccountId;
    use diskquota_entity::scope::Scope;

    fn ticket(ledger: &Arc<ReservationLedger>, scope: Scope) -> AdmissionTicket {
        let id = ledger.reserve(vec![scope], 10);
        AdmissionTicket::new(id, ledger.clone())
    }

    #[tokio::test]
    async fn test_drop_releases() {
        let ledger = Arc::new(ReservationLedger::new(Duration::from_secs(60)));
        let scope = Scope::Account(AccountId::new());
        drop(ticket(&ledger, scope));
        assert_eq!(ledger.reserved_for(scope), 0);
    }

    #[tokio::test]
    async fn test_detach_keeps_reservation() {
        let ledger = Arc::new(ReservationLedger::new(Duration::from_secs(60)));
        let scope = Scope::Account(AccountId::new());
        let id = ticket(&ledger, scope).detach();
        assert_eq!(ledger.reserved_for(scope), 10);
        assert!(ledger.release(id).is_some());
    }

    #[tokio::test]
    async fn test_commit_and_abort_release() {
        let ledger = Arc::new(ReservationLedger::new(Duration::from_secs(60)));
        let scope = Scope::Account(AccountId::new());
        assert!(ticket(&ledger, scope).commit());
        assert!(ticket(&ledger, scope).abort());
        assert!(ledger.is_empty());
    }
}
