use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::arrangement::LendingArrangement;
use crate::config::LedgerDefaults;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::interest::{AccrualEngine, Ledger};
use crate::operation::CashFlowOperation;
use crate::repository::LedgerRepository;
use crate::requests::{ArrangementRequest, OperationRequest};
use crate::types::{ArrangementId, OperationId};
use crate::views::{LedgerView, SummaryView};

/// name reported by the health check
pub const MODULE_NAME: &str = "lending-ledger";

/// health check response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub module: String,
    pub time: DateTime<Utc>,
}

/// service layer over a ledger repository
///
/// All request bodies are validated before they reach the store, and every ledger
/// or summary goes through the same accrual engine.
pub struct LedgerService<R: LedgerRepository> {
    repo: R,
    time: SafeTimeProvider,
    defaults: LedgerDefaults,
    engine: AccrualEngine,
    events: EventStore,
}

impl<R: LedgerRepository> LedgerService<R> {
    pub fn new(repo: R, time: SafeTimeProvider) -> Self {
        Self::with_defaults(repo, time, LedgerDefaults::default())
    }

    pub fn with_defaults(repo: R, time: SafeTimeProvider, defaults: LedgerDefaults) -> Self {
        Self {
            repo,
            time,
            defaults,
            engine: AccrualEngine::new(),
            events: EventStore::new(),
        }
    }

    /// service on the system clock
    pub fn with_system_time(repo: R) -> Self {
        Self::new(repo, SafeTimeProvider::new(hourglass_rs::TimeSource::System))
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn time(&self) -> &SafeTimeProvider {
        &self.time
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            module: MODULE_NAME.to_string(),
            time: self.time.now(),
        }
    }

    // arrangements

    pub fn list_arrangements(&self) -> Result<Vec<LendingArrangement>> {
        self.repo.list_arrangements()
    }

    pub fn create_arrangement(
        &mut self,
        request: &ArrangementRequest,
    ) -> Result<LendingArrangement> {
        let input = request.validate_new().inspect_err(|e| {
            warn!(error = %e, "rejected arrangement");
        })?;

        let now = self.time.now();
        let arrangement = LendingArrangement::create(input, &self.defaults.status, now);
        self.repo.save_arrangement(&arrangement)?;

        info!(arrangement_id = %arrangement.id, name = %arrangement.name, "arrangement created");
        self.events.emit(Event::ArrangementCreated {
            arrangement_id: arrangement.id.clone(),
            name: arrangement.name.clone(),
            base_rate: arrangement.base_rate,
            timestamp: now,
        });

        Ok(arrangement)
    }

    pub fn get_arrangement(&self, id: &ArrangementId) -> Result<LendingArrangement> {
        self.repo
            .get_arrangement(id)?
            .ok_or_else(|| LedgerError::ArrangementNotFound { id: id.clone() })
    }

    pub fn update_arrangement(
        &mut self,
        id: &ArrangementId,
        request: &ArrangementRequest,
    ) -> Result<LendingArrangement> {
        let mut arrangement = self.get_arrangement(id)?;
        let patch = request.validate_patch().inspect_err(|e| {
            warn!(arrangement_id = %id, error = %e, "rejected arrangement update");
        })?;

        let old_rate = arrangement.base_rate;
        arrangement.apply(patch);
        self.repo.save_arrangement(&arrangement)?;

        let now = self.time.now();
        info!(arrangement_id = %id, "arrangement updated");
        if arrangement.base_rate != old_rate {
            self.events.emit(Event::BaseRateChanged {
                arrangement_id: id.clone(),
                old_rate,
                new_rate: arrangement.base_rate,
                timestamp: now,
            });
        }
        self.events.emit(Event::ArrangementUpdated {
            arrangement_id: id.clone(),
            timestamp: now,
        });

        Ok(arrangement)
    }

    /// delete an arrangement together with all of its operations
    pub fn delete_arrangement(&mut self, id: &ArrangementId) -> Result<()> {
        if !self.repo.delete_arrangement(id)? {
            return Err(LedgerError::ArrangementNotFound { id: id.clone() });
        }
        let removed = self.repo.delete_operations_for(id)?;

        info!(arrangement_id = %id, operations_removed = removed, "arrangement deleted");
        self.events.emit(Event::ArrangementDeleted {
            arrangement_id: id.clone(),
            operations_removed: removed,
            timestamp: self.time.now(),
        });

        Ok(())
    }

    // operations

    /// operations of an arrangement by date, same-date entries in insertion order
    pub fn list_operations(
        &self,
        arrangement_id: &ArrangementId,
    ) -> Result<Vec<CashFlowOperation>> {
        self.get_arrangement(arrangement_id)?;
        let mut operations = self.repo.list_operations(arrangement_id)?;
        operations.sort_by_key(|op| op.date);
        Ok(operations)
    }

    pub fn get_operation(&self, id: &OperationId) -> Result<CashFlowOperation> {
        self.repo
            .get_operation(id)?
            .ok_or_else(|| LedgerError::OperationNotFound { id: id.clone() })
    }

    pub fn add_operation(
        &mut self,
        arrangement_id: &ArrangementId,
        request: &OperationRequest,
    ) -> Result<CashFlowOperation> {
        self.get_arrangement(arrangement_id)?;
        let input = request.validate_new().inspect_err(|e| {
            warn!(arrangement_id = %arrangement_id, error = %e, "rejected operation");
        })?;

        let now = self.time.now();
        let operation = CashFlowOperation::create(
            arrangement_id.clone(),
            input,
            &self.defaults.created_by,
            now,
        );
        self.repo.save_operation(&operation)?;

        info!(
            arrangement_id = %arrangement_id,
            operation_id = %operation.id,
            kind = %operation.kind,
            amount = %operation.amount,
            date = %operation.date,
            "operation recorded"
        );
        self.events.emit(Event::OperationRecorded {
            arrangement_id: arrangement_id.clone(),
            operation_id: operation.id.clone(),
            kind: operation.kind,
            amount: operation.amount,
            date: operation.date,
            timestamp: now,
        });

        Ok(operation)
    }

    pub fn update_operation(
        &mut self,
        id: &OperationId,
        request: &OperationRequest,
    ) -> Result<CashFlowOperation> {
        let mut operation = self.get_operation(id)?;
        let patch = request.validate_patch(&operation).inspect_err(|e| {
            warn!(operation_id = %id, error = %e, "rejected operation update");
        })?;

        operation.apply(patch);
        self.repo.save_operation(&operation)?;

        info!(operation_id = %id, "operation updated");
        self.events.emit(Event::OperationUpdated {
            arrangement_id: operation.arrangement_id.clone(),
            operation_id: id.clone(),
            timestamp: self.time.now(),
        });

        Ok(operation)
    }

    pub fn delete_operation(&mut self, id: &OperationId) -> Result<()> {
        let operation = self.get_operation(id)?;
        if !self.repo.delete_operation(id)? {
            return Err(LedgerError::OperationNotFound { id: id.clone() });
        }

        info!(operation_id = %id, "operation deleted");
        self.events.emit(Event::OperationDeleted {
            arrangement_id: operation.arrangement_id,
            operation_id: id.clone(),
            timestamp: self.time.now(),
        });

        Ok(())
    }

    // computed views

    /// run the accrual engine over one arrangement's operations
    pub fn compute(
        &self,
        arrangement_id: &ArrangementId,
    ) -> Result<(LendingArrangement, Ledger)> {
        let arrangement = self.get_arrangement(arrangement_id)?;
        let operations = self.repo.list_operations(arrangement_id)?;
        debug!(
            arrangement_id = %arrangement_id,
            operations = operations.len(),
            "computing ledger"
        );

        let ledger = self.engine.compute(arrangement.base_rate, &operations);
        Ok((arrangement, ledger))
    }

    pub fn summary(&self, arrangement_id: &ArrangementId) -> Result<SummaryView> {
        let (arrangement, ledger) = self.compute(arrangement_id)?;
        Ok(SummaryView::new(arrangement, &ledger.summary))
    }

    pub fn ledger(&self, arrangement_id: &ArrangementId) -> Result<LedgerView> {
        let (arrangement, ledger) = self.compute(arrangement_id)?;
        Ok(LedgerView::new(arrangement, ledger))
    }

    // events

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::decimal::{Money, Rate};
    use crate::repository::InMemoryRepository;
    use crate::types::{OperationType, RateMode, RecordId};

    fn service() -> LedgerService<InMemoryRepository> {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        ));
        LedgerService::new(InMemoryRepository::new(), time)
    }

    fn arrangement_req(body: serde_json::Value) -> ArrangementRequest {
        serde_json::from_value(body).unwrap()
    }

    fn op_req(body: serde_json::Value) -> OperationRequest {
        serde_json::from_value(body).unwrap()
    }

    fn flow(date: &str, kind: &str, amount: i64) -> OperationRequest {
        op_req(json!({ "date": date, "type": kind, "amount": amount }))
    }

    fn create_loan(svc: &mut LedgerService<InMemoryRepository>) -> LendingArrangement {
        svc.create_arrangement(&arrangement_req(json!({
            "name": "Pożyczka",
            "lender": "Anna",
            "borrower": "Piotr",
            "baseRate": 12
        })))
        .unwrap()
    }

    #[test]
    fn test_health() {
        let svc = service();
        let health = svc.health();
        assert_eq!(health.status, "ok");
        assert_eq!(health.module, MODULE_NAME);
        assert_eq!(health.time, Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_create_and_update_arrangement() {
        let mut svc = service();
        let loan = create_loan(&mut svc);
        assert_eq!(loan.status, "active");
        assert_eq!(loan.created_at, svc.time().now());

        let updated = svc
            .update_arrangement(&loan.id, &arrangement_req(json!({ "baseRate": "10,5" })))
            .unwrap();
        assert_eq!(updated.base_rate, Rate::from_percent(dec!(10.5)));
        assert_eq!(updated.created_at, loan.created_at);
        assert_eq!(svc.list_arrangements().unwrap(), vec![updated]);

        let events = svc.take_events();
        assert!(matches!(events[0], Event::ArrangementCreated { .. }));
        assert!(matches!(events[1], Event::BaseRateChanged { .. }));
        assert!(matches!(events[2], Event::ArrangementUpdated { .. }));
    }

    #[test]
    fn test_invalid_requests_never_reach_store() {
        let mut svc = service();
        let bad_rate = arrangement_req(json!({ "name": "x", "baseRate": "dużo" }));
        assert!(svc.create_arrangement(&bad_rate).is_err());
        assert!(svc.list_arrangements().unwrap().is_empty());

        let loan = create_loan(&mut svc);
        let err = svc
            .add_operation(&loan.id, &flow("2024-01-01", "Wplata", -1))
            .unwrap_err();
        assert_eq!(err.to_string(), "amount: amount must be a positive number");
        assert!(svc.list_operations(&loan.id).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_amount_is_rejected_before_compute() {
        let mut svc = service();
        let loan = create_loan(&mut svc);
        let huge = op_req(json!({
            "date": "2024-01-01",
            "type": "Wplata",
            "amount": "50000000000000000000000000000"
        }));

        assert!(svc.add_operation(&loan.id, &huge).is_err());
        assert_eq!(svc.summary(&loan.id).unwrap().operations_count, 0);
    }

    #[test]
    fn test_missing_records_are_reported() {
        let mut svc = service();
        let missing = RecordId::from("inv_missing");

        assert!(matches!(
            svc.summary(&missing),
            Err(LedgerError::ArrangementNotFound { .. })
        ));
        assert!(matches!(
            svc.add_operation(&missing, &flow("2024-01-01", "Wplata", 1)),
            Err(LedgerError::ArrangementNotFound { .. })
        ));
        assert!(matches!(
            svc.delete_operation(&missing),
            Err(LedgerError::OperationNotFound { .. })
        ));
        assert!(matches!(
            svc.delete_arrangement(&missing),
            Err(LedgerError::ArrangementNotFound { .. })
        ));
    }

    #[test]
    fn test_summary_and_ledger_agree() {
        let mut svc = service();
        let loan = create_loan(&mut svc);

        svc.add_operation(&loan.id, &flow("2024-07-01", "Splata", 200))
            .unwrap();
        svc.add_operation(
            &loan.id,
            &op_req(json!({ "date": "2024-01-01", "type": "Wplata", "amount": "1000" })),
        )
        .unwrap();

        let summary = svc.summary(&loan.id).unwrap();
        let ledger = svc.ledger(&loan.id).unwrap();

        assert_eq!(summary.operations_count, 2);
        assert_eq!(summary.total_deposits, Money::from_major(1_000));
        assert_eq!(summary.total_repayments, Money::from_major(200));
        assert_eq!(summary.final_balance, Money::from_major(800));
        assert_eq!(
            summary.total_interest.round_dp(2),
            Money::from_str_exact("59.84").unwrap()
        );
        assert_eq!(summary.period.as_deref(), Some("2024-01-01 → 2024-07-01"));

        assert_eq!(ledger.summary.total_interest, summary.total_interest);
        assert_eq!(ledger.rows[0].kind, OperationType::Deposit);
        assert_eq!(ledger.rows[1].elapsed_days, 182);
        assert_eq!(ledger.rows[1].balance_after, summary.final_balance);
    }

    #[test]
    fn test_list_operations_sorted_with_stable_ties() {
        let mut svc = service();
        let loan = create_loan(&mut svc);

        let late = svc
            .add_operation(&loan.id, &flow("2024-05-01", "Wplata", 1))
            .unwrap();
        let tie_a = svc
            .add_operation(&loan.id, &flow("2024-02-01", "Wplata", 2))
            .unwrap();
        let tie_b = svc
            .add_operation(&loan.id, &flow("2024-02-01", "Splata", 3))
            .unwrap();

        let ids: Vec<OperationId> = svc
            .list_operations(&loan.id)
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![tie_a.id, tie_b.id, late.id]);
    }

    #[test]
    fn test_update_operation_rate_mode() {
        let mut svc = service();
        let loan = create_loan(&mut svc);
        svc.add_operation(&loan.id, &flow("2024-01-01", "Wplata", 1000))
            .unwrap();
        let op = svc
            .add_operation(
                &loan.id,
                &op_req(json!({
                    "date": "2025-01-01",
                    "type": "Wplata",
                    "amount": 1,
                    "rateMode": "custom",
                    "customRate": 5,
                    "createdBy": "demo-user"
                })),
            )
            .unwrap();
        assert_eq!(op.created_by, "demo-user");
        assert_eq!(
            svc.ledger(&loan.id).unwrap().rows[1].effective_rate,
            Rate::from_percentage(5)
        );

        let updated = svc
            .update_operation(&op.id, &op_req(json!({ "rateMode": "global", "note": "korekta" })))
            .unwrap();
        assert_eq!(updated.rate_mode, RateMode::Global);
        assert_eq!(updated.custom_rate, None);
        assert_eq!(updated.note, "korekta");
        assert_eq!(updated.created_by, "demo-user");
        assert_eq!(updated.date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let row = &svc.ledger(&loan.id).unwrap().rows[1];
        assert_eq!(row.effective_rate, Rate::from_percentage(12));
        assert_eq!(row.note, "korekta");
    }

    #[test]
    fn test_delete_arrangement_cascades() {
        let mut svc = service();
        let keep = create_loan(&mut svc);
        let gone = create_loan(&mut svc);

        for loan in [&keep, &gone] {
            svc.add_operation(&loan.id, &flow("2024-01-01", "Wplata", 10))
                .unwrap();
            svc.add_operation(&loan.id, &flow("2024-02-01", "Splata", 5))
                .unwrap();
        }
        svc.take_events();

        svc.delete_arrangement(&gone.id).unwrap();

        let snapshot = svc.repository().snapshot();
        assert!(snapshot.operations.iter().all(|o| o.arrangement_id != gone.id));
        assert_eq!(snapshot.operations.len(), 2);
        assert_eq!(svc.list_arrangements().unwrap(), vec![keep]);
        assert!(matches!(
            svc.take_events().as_slice(),
            [Event::ArrangementDeleted { operations_removed: 2, .. }]
        ));
    }

    #[test]
    fn test_delete_single_operation_leaves_arrangement() {
        let mut svc = service();
        let loan = create_loan(&mut svc);
        let op = svc
            .add_operation(&loan.id, &flow("2024-01-01", "Wplata", 10))
            .unwrap();

        svc.delete_operation(&op.id).unwrap();

        assert!(svc.list_operations(&loan.id).unwrap().is_empty());
        assert_eq!(svc.get_arrangement(&loan.id).unwrap(), loan);
        assert_eq!(svc.summary(&loan.id).unwrap().period, None);
    }
}
