use crate::arrangement::LendingArrangement;
use crate::errors::Result;
use crate::operation::CashFlowOperation;
use crate::types::{ArrangementId, OperationId};

use super::{LedgerDatabase, LedgerRepository};

/// repository kept entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    db: LedgerDatabase,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// start from an existing snapshot
    pub fn with_database(db: LedgerDatabase) -> Self {
        Self { db }
    }

    pub fn snapshot(&self) -> &LedgerDatabase {
        &self.db
    }
}

impl LedgerRepository for InMemoryRepository {
    fn list_arrangements(&self) -> Result<Vec<LendingArrangement>> {
        Ok(self.db.investments.clone())
    }

    fn get_arrangement(&self, id: &ArrangementId) -> Result<Option<LendingArrangement>> {
        Ok(self.db.arrangement(id).cloned())
    }

    fn save_arrangement(&mut self, arrangement: &LendingArrangement) -> Result<()> {
        self.db.upsert_arrangement(arrangement);
        Ok(())
    }

    fn delete_arrangement(&mut self, id: &ArrangementId) -> Result<bool> {
        Ok(self.db.remove_arrangement(id))
    }

    fn list_operations(&self, arrangement_id: &ArrangementId) -> Result<Vec<CashFlowOperation>> {
        Ok(self.db.operations_of(arrangement_id))
    }

    fn get_operation(&self, id: &OperationId) -> Result<Option<CashFlowOperation>> {
        Ok(self.db.operation(id).cloned())
    }

    fn save_operation(&mut self, operation: &CashFlowOperation) -> Result<()> {
        self.db.upsert_operation(operation);
        Ok(())
    }

    fn delete_operation(&mut self, id: &OperationId) -> Result<bool> {
        Ok(self.db.remove_operation(id))
    }

    fn delete_operations_for(&mut self, arrangement_id: &ArrangementId) -> Result<usize> {
        Ok(self.db.remove_operations_of(arrangement_id))
    }
}
