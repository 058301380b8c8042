pub mod accrual;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::OperationType;

pub use accrual::{compute_ledger, elapsed_days, AccrualEngine, YEAR_BASIS};

/// what the accrual engine needs to know about one cash movement
pub trait CashFlow {
    fn date(&self) -> NaiveDate;

    fn kind(&self) -> OperationType;

    fn amount(&self) -> Money;

    /// operation-specific rate, `None` to accrue at the arrangement's base rate
    fn rate_override(&self) -> Option<Rate>;

    fn note(&self) -> &str {
        ""
    }
}

/// one computed ledger line per operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRow {
    /// 1-based position in chronological order
    pub index: usize,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: OperationType,
    pub amount: Money,
    pub balance_before: Money,
    pub elapsed_days: u32,
    pub effective_rate: Rate,
    /// interest accrued on `balance_before` over `elapsed_days`
    pub interest: Money,
    pub balance_after: Money,
    pub note: String,
}

/// first and last operation dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl LedgerPeriod {
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days()
    }
}

/// aggregate totals over a whole ledger
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total_deposits: Money,
    pub total_repayments: Money,
    pub final_balance: Money,
    pub total_interest: Money,
    pub period: Option<LedgerPeriod>,
    pub operations_count: usize,
}

/// rows and summary produced in a single pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub rows: Vec<LedgerRow>,
    pub summary: LedgerSummary,
}

impl Ledger {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// outstanding principal plus all interest accrued so far
    pub fn total_due(&self) -> Money {
        self.summary.final_balance.saturating_add(self.summary.total_interest)
    }
}
