use thiserror::Error;

use crate::types::{ArrangementId, OperationId};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("arrangement not found: {id}")]
    ArrangementNotFound {
        id: ArrangementId,
    },

    #[error("operation not found: {id}")]
    OperationNotFound {
        id: OperationId,
    },

    #[error("storage error: {message}")]
    Storage {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl LedgerError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        LedgerError::Validation {
            field,
            message: message.into(),
        }
    }

    /// true for errors caused by caller input rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation { .. }
                | LedgerError::ArrangementNotFound { .. }
                | LedgerError::OperationNotFound { .. }
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(e: std::io::Error) -> Self {
        LedgerError::Storage {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
