pub mod json_file;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::arrangement::LendingArrangement;
use crate::errors::Result;
use crate::operation::CashFlowOperation;
use crate::types::{ArrangementId, OperationId};

pub use json_file::JsonFileRepository;
pub use memory::InMemoryRepository;

/// storage seam for arrangements and their operations
///
/// Lists return records in insertion order; saving an existing record replaces it
/// in place so that order is preserved across updates.
pub trait LedgerRepository {
    fn list_arrangements(&self) -> Result<Vec<LendingArrangement>>;

    fn get_arrangement(&self, id: &ArrangementId) -> Result<Option<LendingArrangement>>;

    fn save_arrangement(&mut self, arrangement: &LendingArrangement) -> Result<()>;

    /// returns false when nothing was removed
    fn delete_arrangement(&mut self, id: &ArrangementId) -> Result<bool>;

    fn list_operations(&self, arrangement_id: &ArrangementId) -> Result<Vec<CashFlowOperation>>;

    fn get_operation(&self, id: &OperationId) -> Result<Option<CashFlowOperation>>;

    fn save_operation(&mut self, operation: &CashFlowOperation) -> Result<()>;

    fn delete_operation(&mut self, id: &OperationId) -> Result<bool>;

    /// remove every operation of an arrangement, returning how many went
    fn delete_operations_for(&mut self, arrangement_id: &ArrangementId) -> Result<usize>;
}

/// whole-store snapshot, laid out as the `db.json` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerDatabase {
    #[serde(default)]
    pub investments: Vec<LendingArrangement>,
    #[serde(default)]
    pub operations: Vec<CashFlowOperation>,
}

impl LedgerDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arrangement(&self, id: &ArrangementId) -> Option<&LendingArrangement> {
        self.investments.iter().find(|a| &a.id == id)
    }

    pub fn upsert_arrangement(&mut self, arrangement: &LendingArrangement) {
        match self.investments.iter_mut().find(|a| a.id == arrangement.id) {
            Some(existing) => *existing = arrangement.clone(),
            None => self.investments.push(arrangement.clone()),
        }
    }

    pub fn remove_arrangement(&mut self, id: &ArrangementId) -> bool {
        let before = self.investments.len();
        self.investments.retain(|a| &a.id != id);
        self.investments.len() != before
    }

    pub fn operations_of(&self, arrangement_id: &ArrangementId) -> Vec<CashFlowOperation> {
        self.operations
            .iter()
            .filter(|o| &o.arrangement_id == arrangement_id)
            .cloned()
            .collect()
    }

    pub fn operation(&self, id: &OperationId) -> Option<&CashFlowOperation> {
        self.operations.iter().find(|o| &o.id == id)
    }

    pub fn upsert_operation(&mut self, operation: &CashFlowOperation) {
        match self.operations.iter_mut().find(|o| o.id == operation.id) {
            Some(existing) => *existing = operation.clone(),
            None => self.operations.push(operation.clone()),
        }
    }

    pub fn remove_operation(&mut self, id: &OperationId) -> bool {
        let before = self.operations.len();
        self.operations.retain(|o| &o.id != id);
        self.operations.len() != before
    }

    pub fn remove_operations_of(&mut self, arrangement_id: &ArrangementId) -> usize {
        let before = self.operations.len();
        self.operations.retain(|o| &o.arrangement_id != arrangement_id);
        before - self.operations.len()
    }
}
