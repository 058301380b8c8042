pub mod arrangement;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod operation;
pub mod repository;
pub mod requests;
pub mod service;
pub mod types;
pub mod views;

// re-export key types
pub use arrangement::LendingArrangement;
pub use config::{LedgerConfig, LedgerDefaults, StoreConfig};
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use interest::{
    compute_ledger, elapsed_days, AccrualEngine, CashFlow, Ledger, LedgerPeriod, LedgerRow,
    LedgerSummary, YEAR_BASIS,
};
pub use operation::CashFlowOperation;
pub use repository::{InMemoryRepository, JsonFileRepository, LedgerDatabase, LedgerRepository};
pub use requests::{ArrangementRequest, OperationRequest, MAX_AMOUNT, MAX_RATE_PERCENT};
pub use service::{HealthStatus, LedgerService};
pub use types::{ArrangementId, OperationId, OperationType, RateMode, RecordId};
pub use views::{LedgerView, SummaryView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
