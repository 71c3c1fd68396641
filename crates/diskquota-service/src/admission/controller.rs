//! Admission controller: admit or reject a pending write.
//!
//! Check-and-reserve runs under the per-scope locks of every scope the
//! write is charged to, so two writers can never both be admitted into
//! the same remaining capacity. Collaborator failures admit fail-open and
//! flag the decision as degraded.

use std::sync::Arc;

use tracing::{error, info, warn};

use diskquota_core::error::AppError;
use diskquota_core::result::AppResult;
use diskquota_core::types::id::ReservationId;
use diskquota_entity::admission::{AdmissionDecision, CheckOutcome, ScopeCheck, SkipReason};
use diskquota_entity::asset::{AssetOperation, PendingAsset};
use diskquota_entity::quota::QuotaLimit;
use diskquota_entity::scope::Scope;

use super::ledger::ReservationLedger;
use super::locks::ScopeLocks;
use super::ticket::AdmissionTicket;
use crate::policy::PolicyResolver;
use crate::scope::ScopeResolver;
use crate::usage::UsageAggregator;

/// A decision plus, when capacity was reserved, the ticket holding it.
#[derive(Debug)]
pub struct Admission {
    /// The structured decision.
    pub decision: AdmissionDecision,
    /// Reservation handle for admitted writes against finite limits.
    pub ticket: Option<AdmissionTicket>,
}

impl Admission {
    /// Whether the write may proceed.
    pub fn is_admitted(&self) -> bool {
        self.decision.admitted
    }

    /// Give up the RAII handle, keeping the reservation alive under its
    /// TTL. Used when commit or abort arrives later by id.
    pub fn detach(self) -> AdmissionDecision {
        if let Some(ticket) = self.ticket {
            let _ = ticket.detach();
        }
        self.decision
    }
}

/// Decides admit/reject for pending writes.
#[derive(Debug, Clone)]
pub struct AdmissionController {
    scopes: ScopeResolver,
    usage: UsageAggregator,
    policy: PolicyResolver,
    ledger: Arc<ReservationLedger>,
    locks: ScopeLocks,
}

impl AdmissionController {
    /// Creates a new admission controller.
    pub fn new(
        scopes: ScopeResolver,
        usage: UsageAggregator,
        policy: PolicyResolver,
        ledger: Arc<ReservationLedger>,
        locks: ScopeLocks,
    ) -> Self {
        Self {
            scopes,
            usage,
            policy,
            ledger,
            locks,
        }
    }

    /// Check a pending write against every scope it is charged to.
    pub async fn check(&self, pending: &PendingAsset) -> AppResult<Admission> {
        if !pending.requires_check() {
            let reason = match pending.operation {
                AssetOperation::Update => SkipReason::NotACreation,
                AssetOperation::Create => SkipReason::UnknownSize,
            };
            return Ok(Admission {
                decision: AdmissionDecision::skipped(pending.size_bytes, reason),
                ticket: None,
            });
        }

        let scopes = self.scopes.resolve(pending).await;
        self.evaluate(scopes, pending.size_bytes).await
    }

    /// Check a candidate write against a single scope.
    pub async fn admit(&self, scope: Scope, candidate_bytes: u64) -> AppResult<Admission> {
        if candidate_bytes == 0 {
            return Ok(Admission {
                decision: AdmissionDecision::skipped(0, SkipReason::UnknownSize),
                ticket: None,
            });
        }
        self.evaluate(vec![scope], candidate_bytes).await
    }

    /// Evaluate `scopes` in order, reserving capacity if all admit.
    async fn evaluate(&self, scopes: Vec<Scope>, candidate_bytes: u64) -> AppResult<Admission> {
        if scopes.is_empty() {
            return Err(AppError::internal("Admission requires at least one scope"));
        }

        let _guards = self.locks.lock_all(&scopes).await;

        let mut checks = Vec::with_capacity(scopes.len());
        for scope in scopes {
            let check = self.evaluate_scope(scope, candidate_bytes).await;
            let rejected = check.outcome == CheckOutcome::Rejected;
            checks.push(check);
            if rejected {
                break;
            }
        }

        let mut decision = AdmissionDecision::from_checks(candidate_bytes, checks);

        if let Some(rejection) = &decision.rejection {
            info!(
                scope = %rejection.scope,
                used_bytes = rejection.used_bytes,
                limit_bytes = rejection.limit_bytes,
                candidate_bytes = candidate_bytes,
                "Upload rejected"
            );
            return Ok(Admission {
                decision,
                ticket: None,
            });
        }

        if decision.degraded {
            warn!(
                candidate_bytes = candidate_bytes,
                degraded = true,
                "Admitted without a complete quota check"
            );
        }

        let charged: Vec<Scope> = decision
            .checks
            .iter()
            .filter(|c| c.outcome != CheckOutcome::Unlimited)
            .map(|c| c.scope)
            .collect();

        let ticket = if charged.is_empty() {
            None
        } else {
            let id = self.ledger.reserve(charged, candidate_bytes);
            decision.reservation_id = Some(id);
            Some(AdmissionTicket::new(id, self.ledger.clone()))
        };

        Ok(Admission { decision, ticket })
    }

    async fn evaluate_scope(&self, scope: Scope, candidate_bytes: u64) -> ScopeCheck {
        let reserved_bytes = self.ledger.reserved_for(scope);
        let mut check = ScopeCheck {
            scope,
            outcome: CheckOutcome::Degraded,
            used_bytes: None,
            reserved_bytes,
            limit_bytes: 0,
            candidate_bytes,
        };

        let limit = match self.policy.limit(scope).await {
            Ok(limit) => limit,
            Err(e) if e.is_transient() => {
                warn!(scope = %scope, error = %e, degraded = true, "Quota limit unavailable, admitting");
                return check;
            }
            Err(e) => {
                error!(scope = %scope, error = %e, degraded = true, "Quota limit unreadable, admitting");
                return check;
            }
        };

        let usage = self.usage.usage(scope).await;
        check.used_bytes = usage.bytes();
        check.limit_bytes = limit.bytes();

        check.outcome = match (limit, usage.bytes()) {
            (QuotaLimit::Unlimited, _) => CheckOutcome::Unlimited,
            (QuotaLimit::Bytes(_), None) => CheckOutcome::Degraded,
            (limit, Some(used)) => {
                if limit.admits(used.saturating_add(reserved_bytes), candidate_bytes) {
                    CheckOutcome::Admitted
                } else {
                    CheckOutcome::Rejected
                }
            }
        };

        check
    }

    /// Release a reservation after the write was durably committed.
    pub async fn commit(&self, reservation_id: ReservationId) -> AppResult<()> {
        self.release(reservation_id, "committed")
    }

    /// Release a reservation after the write was abandoned.
    pub async fn abort(&self, reservation_id: ReservationId) -> AppResult<()> {
        self.release(reservation_id, "aborted")
    }

    fn release(&self, reservation_id: ReservationId, how: &str) -> AppResult<()> {
        match self.ledger.release(reservation_id) {
            Some(reservation) => {
                info!(
                    reservation_id = %reservation_id,
                    bytes = reservation.bytes,
                    outcome = how,
                    "Reservation released"
                );
                Ok(())
            }
            None => Err(AppError::not_found(format!(
                "Reservation {reservation_id} not found or expired"
            ))),
        }
    }

    /// The reservation ledger.
    pub fn ledger(&self) -> &Arc<ReservationLedger> {
        &self.ledger
    }

    /// The per-scope lock table.
    pub fn locks(&self) -> &ScopeLocks {
        &self.locks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use diskquota_core::error::ErrorKind;
    use diskquota_core::traits::{AssetInventory, SettingsStore};
    use diskquota_core::types::id::{AccountId, CollectionId, GroupId, ItemId};
    use diskquota_database::{MemoryInventory, MemorySettingsStore};
    use diskquota_entity::asset::Asset;
    use diskquota_entity::quota::QuotaDefaults;
    use diskquota_entity::units::mb_to_bytes;

    use crate::policy::DefaultsRegistry;

    struct Fixture {
        settings: MemorySettingsStore,
        inventory: MemoryInventory,
        controller: AdmissionController,
    }

    fn fixture() -> Fixture {
        let settings = MemorySettingsStore::new();
        let inventory = MemoryInventory::new();
        let timeout = Duration::from_millis(200);
        let inventory_dyn: Arc<dyn AssetInventory> =
            Arc::new(inventory.clone());

        let controller = AdmissionController::new(
            ScopeResolver::new(inventory_dyn.clone(), timeout),
            UsageAggregator::new(inventory_dyn, timeout),
            PolicyResolver::new(
                Arc::new(settings.clone()),
                DefaultsRegistry::new(QuotaDefaults::default()),
                timeout,
            ),
            Arc::new(ReservationLedger::new(Duration::from_secs(300))),
            ScopeLocks::new(),
        );

        Fixture {
            settings,
            inventory,
            controller,
        }
    }

    async fn account_with(f: &Fixture, limit_mb: i64, used_mb: u64) -> AccountId {
        let owner = AccountId::new();
        f.settings
            .set(&Scope::Account(owner).override_key(), limit_mb)
            .await
            .unwrap();
        if used_mb > 0 {
            f.inventory
                .add_asset(Asset::new(owner, None, mb_to_bytes(used_mb)))
                .await;
        }
        owner
    }

    #[tokio::test]
    async fn test_fits_is_admitted() {
        let f = fixture();
        let owner = account_with(&f, 100, 50).await;

        let admission = f
            .controller
            .check(&PendingAsset::create(owner, None, mb_to_bytes(20)))
            .await
            .unwrap();
        assert!(admission.is_admitted());
        assert!(!admission.decision.degraded);
        assert!(admission.decision.reservation_id.is_some());
        assert!(admission.ticket.is_some());
    }

    #[tokio::test]
    async fn test_overflow_is_rejected_with_figures() {
        let f = fixture();
        let owner = account_with(&f, 100, 50).await;

        let admission = f
            .controller
            .check(&PendingAsset::create(owner, None, mb_to_bytes(60)))
            .await
            .unwrap();
        assert!(!admission.is_admitted());
        assert!(admission.ticket.is_none());

        let rejection = admission.decision.rejection.unwrap();
        assert_eq!(rejection.scope, Scope::Account(owner));
        assert_eq!(rejection.used_bytes, mb_to_bytes(50));
        assert_eq!(rejection.limit_bytes, mb_to_bytes(100));
        assert_eq!(rejection.candidate_bytes, mb_to_bytes(60));
        assert!(rejection.message().contains("File: 60.00 MB, Used: 50.00 MB, Limit: 100.00 MB"));
    }

    #[tokio::test]
    async fn test_exact_boundary_is_admitted() {
        let f = fixture();
        let owner = account_with(&f, 100, 50).await;

        let exact = f
            .controller
            .check(&PendingAsset::create(owner, None, mb_to_bytes(50)))
            .await
            .unwrap();
        assert!(exact.is_admitted());
        drop(exact);

        let over = f
            .controller
            .check(&PendingAsset::create(owner, None, mb_to_bytes(50) + 1))
            .await
            .unwrap();
        assert!(!over.is_admitted());
    }

    #[tokio::test]
    async fn test_unlimited_admits_even_when_usage_fails() {
        let f = fixture();
        let owner = account_with(&f, 0, 0).await;
        f.inventory.faults().set_available(false);

        let admission = f
            .controller
            .check(&PendingAsset::create(owner, None, u64::MAX / 2))
            .await
            .unwrap();
        assert!(admission.is_admitted());
        assert!(admission.decision.degraded);
        assert_eq!(admission.decision.checks[0].outcome, CheckOutcome::Unlimited);
        assert_eq!(admission.decision.checks[0].used_bytes, None);
        assert!(admission.ticket.is_none());
    }

    #[tokio::test]
    async fn test_usage_failure_admits_degraded() {
        let f = fixture();
        let owner = account_with(&f, 100, 99).await;
        f.inventory.faults().set_available(false);

        let admission = f
            .controller
            .check(&PendingAsset::create(owner, None, mb_to_bytes(60)))
            .await
            .unwrap();
        assert!(admission.is_admitted());
        assert!(admission.decision.degraded);
    }

    #[tokio::test]
    async fn test_settings_failure_admits_degraded() {
        let f = fixture();
        let owner = AccountId::new();
        f.settings.faults().set_available(false);

        let admission = f
            .controller
            .check(&PendingAsset::create(owner, None, mb_to_bytes(10_000)))
            .await
            .unwrap();
        assert!(admission.is_admitted());
        assert!(admission.decision.degraded);
    }

    #[tokio::test]
    async fn test_corrupt_override_admits_degraded() {
        let f = fixture();
        let owner = AccountId::new();
        f.settings.insert_raw(&Scope::Account(owner).override_key(), -1);

        let admission = f
            .controller
            .check(&PendingAsset::create(owner, None, 1))
            .await
            .unwrap();
        assert!(admission.is_admitted());
        assert!(admission.decision.degraded);
    }

    #[tokio::test]
    async fn test_collection_rejection_after_account_admits() {
        let f = fixture();
        let owner = account_with(&f, 0, 0).await;
        let item = ItemId::new();
        let collection = CollectionId::new();
        f.inventory.assign_item(item, collection).await;
        f.settings
            .set(&Scope::Collection(collection).override_key(), 10)
            .await
            .unwrap();

        let admission = f
            .controller
            .check(&PendingAsset::create(owner, Some(item), mb_to_bytes(11)))
            .await
            .unwrap();
        assert!(!admission.is_admitted());
        assert_eq!(
            admission.decision.rejection.unwrap().scope,
            Scope::Collection(collection)
        );
        assert_eq!(admission.decision.checks.len(), 2);
        assert!(f.controller.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_account_rejection_stops_evaluation() {
        let f = fixture();
        let owner = account_with(&f, 1, 0).await;
        let item = ItemId::new();
        f.inventory.assign_item(item, CollectionId::new()).await;

        let admission = f
            .controller
            .check(&PendingAsset::create(owner, Some(item), mb_to_bytes(2)))
            .await
            .unwrap();
        assert_eq!(admission.decision.checks.len(), 1);
        assert_eq!(
            admission.decision.deciding_scope(),
            Some(Scope::Account(owner))
        );
    }

    #[tokio::test]
    async fn test_collection_counts_shared_asset_once() {
        let f = fixture();
        let owner = account_with(&f, 0, 0).await;
        let item = ItemId::new();
        let group = GroupId::new();
        let collection = CollectionId::new();
        f.inventory.assign_item(item, collection).await;
        f.inventory.add_item_to_group(item, group).await;
        f.inventory.link_group(group, collection).await;
        f.inventory
            .add_asset(Asset::new(owner, Some(item), mb_to_bytes(40)))
            .await;
        f.settings
            .set(&Scope::Collection(collection).override_key(), 100)
            .await
            .unwrap();

        // Double counting would see 80 MB used and reject.
        let admission = f
            .controller
            .check(&PendingAsset::create(owner, Some(item), mb_to_bytes(50)))
            .await
            .unwrap();
        assert!(admission.is_admitted());
    }

    #[tokio::test]
    async fn test_updates_and_unknown_sizes_skip_checks() {
        let f = fixture();
        let owner = account_with(&f, 1, 1).await;

        let update = PendingAsset {
            operation: AssetOperation::Update,
            ..PendingAsset::create(owner, None, mb_to_bytes(100))
        };
        let admission = f.controller.check(&update).await.unwrap();
        assert!(admission.is_admitted());
        assert_eq!(admission.decision.skipped, Some(SkipReason::NotACreation));

        let unknown = f
            .controller
            .check(&PendingAsset::create(owner, None, 0))
            .await
            .unwrap();
        assert_eq!(unknown.decision.skipped, Some(SkipReason::UnknownSize));
        assert!(unknown.ticket.is_none());
    }

    #[tokio::test]
    async fn test_reservations_count_toward_usage() {
        let f = fixture();
        let owner = account_with(&f, 100, 0).await;
        let pending = PendingAsset::create(owner, None, mb_to_bytes(60));

        let first = f.controller.check(&pending).await.unwrap();
        assert!(first.is_admitted());

        let second = f.controller.check(&pending).await.unwrap();
        assert!(!second.is_admitted());
        assert_eq!(
            second.decision.rejection.unwrap().used_bytes,
            mb_to_bytes(60)
        );

        // Abort frees capacity immediately.
        assert!(first.ticket.unwrap().abort());
        let third = f.controller.check(&pending).await.unwrap();
        assert!(third.is_admitted());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_never_overcommit() {
        let f = fixture();
        let owner = account_with(&f, 100, 0).await;
        let controller = Arc::new(f.controller.clone());

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let controller = controller.clone();
                tokio::spawn(async move {
                    controller
                        .check(&PendingAsset::create(owner, None, mb_to_bytes(7)))
                        .await
                        .map(Admission::detach)
                })
            })
            .collect();

        let mut admitted = 0;
        for task in tasks {
            if task.await.unwrap().unwrap().admitted {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 14);
        assert_eq!(
            controller.ledger().reserved_for(Scope::Account(owner)),
            mb_to_bytes(98)
        );
    }

    #[tokio::test]
    async fn test_commit_and_abort_by_id() {
        let f = fixture();
        let owner = account_with(&f, 100, 0).await;

        let decision = f
            .controller
            .check(&PendingAsset::create(owner, None, mb_to_bytes(10)))
            .await
            .unwrap()
            .detach();
        let id = decision.reservation_id.unwrap();
        assert_eq!(
            f.controller.ledger().reserved_for(Scope::Account(owner)),
            mb_to_bytes(10)
        );

        f.controller.commit(id).await.unwrap();
        let err = f.controller.abort(id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_reservation_frees_capacity() {
        let f = fixture();
        let owner = account_with(&f, 100, 0).await;
        let pending = PendingAsset::create(owner, None, mb_to_bytes(80));

        let abandoned = f.controller.check(&pending).await.unwrap().detach();
        assert!(abandoned.admitted);
        assert!(!f.controller.check(&pending).await.unwrap().is_admitted());

        tokio::time::advance(Duration::from_secs(301)).await;
        assert!(f.controller.check(&pending).await.unwrap().is_admitted());
    }

    #[tokio::test]
    async fn test_single_scope_admit() {
        let f = fixture();
        let collection = CollectionId::new();
        let scope = Scope::Collection(collection);
        f.settings.set(&scope.override_key(), 10).await.unwrap();

        let admitted = f.controller.admit(scope, mb_to_bytes(10)).await.unwrap();
        assert!(admitted.is_admitted());
        let rejected = f.controller.admit(scope, 1).await.unwrap();
        assert!(!rejected.is_admitted());
    }
}
