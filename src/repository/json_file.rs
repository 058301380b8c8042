use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::arrangement::LendingArrangement;
use crate::errors::{LedgerError, Result};
use crate::operation::CashFlowOperation;
use crate::types::{ArrangementId, OperationId};

use super::{LedgerDatabase, LedgerRepository};

/// repository backed by a single pretty-printed JSON file
///
/// The file is read on every call and rewritten after every mutation, so edits
/// made by another process between calls are picked up. A missing file is created
/// empty; a corrupt one is logged and reset.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// read the whole store from disk
    ///
    /// A file that is not JSON at all is copied aside to `<name>.corrupt` and the
    /// store restarts empty. A JSON file that does not match the store layout is
    /// left untouched and reported as a storage error.
    pub fn load(&self) -> Result<LedgerDatabase> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "store file missing, creating empty store");
            let db = LedgerDatabase::new();
            self.save(&db)?;
            return Ok(db);
        }

        let raw = fs::read_to_string(&self.path)?;
        let err = match serde_json::from_str::<LedgerDatabase>(&raw) {
            Ok(db) => {
                debug!(
                    path = %self.path.display(),
                    arrangements = db.investments.len(),
                    operations = db.operations.len(),
                    "store loaded"
                );
                return Ok(db);
            }
            Err(e) => e,
        };

        if serde_json::from_str::<serde_json::Value>(&raw).is_ok() {
            error!(
                path = %self.path.display(),
                error = %err,
                "store does not match the expected layout"
            );
            return Err(LedgerError::Storage {
                message: format!("{}: {}", self.path.display(), err),
            });
        }

        let backup = self.backup_path();
        fs::copy(&self.path, &backup)?;
        error!(
            path = %self.path.display(),
            backup = %backup.display(),
            error = %err,
            "failed to parse store, resetting"
        );
        let db = LedgerDatabase::new();
        self.save(&db)?;
        Ok(db)
    }

    /// where an unparseable store file is copied before it is reset
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    /// write the whole store to disk, replacing the file atomically
    pub fn save(&self, db: &LedgerDatabase) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(db)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn modify<T>(&mut self, f: impl FnOnce(&mut LedgerDatabase) -> T) -> Result<T> {
        let mut db = self.load()?;
        let out = f(&mut db);
        self.save(&db)?;
        Ok(out)
    }
}

impl LedgerRepository for JsonFileRepository {
    fn list_arrangements(&self) -> Result<Vec<LendingArrangement>> {
        Ok(self.load()?.investments)
    }

    fn get_arrangement(&self, id: &ArrangementId) -> Result<Option<LendingArrangement>> {
        Ok(self.load()?.arrangement(id).cloned())
    }

    fn save_arrangement(&mut self, arrangement: &LendingArrangement) -> Result<()> {
        self.modify(|db| db.upsert_arrangement(arrangement))
    }

    fn delete_arrangement(&mut self, id: &ArrangementId) -> Result<bool> {
        self.modify(|db| db.remove_arrangement(id))
    }

    fn list_operations(&self, arrangement_id: &ArrangementId) -> Result<Vec<CashFlowOperation>> {
        Ok(self.load()?.operations_of(arrangement_id))
    }

    fn get_operation(&self, id: &OperationId) -> Result<Option<CashFlowOperation>> {
        Ok(self.load()?.operation(id).cloned())
    }

    fn save_operation(&mut self, operation: &CashFlowOperation) -> Result<()> {
        self.modify(|db| db.upsert_operation(operation))
    }

    fn delete_operation(&mut self, id: &OperationId) -> Result<bool> {
        self.modify(|db| db.remove_operation(id))
    }

    fn delete_operations_for(&mut self, arrangement_id: &ArrangementId) -> Result<usize> {
        self.modify(|db| db.remove_operations_of(arrangement_id))
    }
}
