use chrono::NaiveDate;
use tracing::debug;

use crate::decimal::{Money, Rate};
use crate::types::OperationType;

use super::{CashFlow, Ledger, LedgerPeriod, LedgerRow, LedgerSummary};

/// actual days / 365, no leap-year adjustment
pub const YEAR_BASIS: u32 = 365;

/// engine for walking a cash-flow history and accruing simple interest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualEngine {
    pub year_basis: u32,
}

impl Default for AccrualEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AccrualEngine {
    pub fn new() -> Self {
        Self {
            year_basis: YEAR_BASIS,
        }
    }

    /// simple interest on a balance; zero unless the balance is positive
    pub fn period_interest(&self, balance: Money, annual_rate: Rate, days: u32) -> Money {
        if !balance.is_positive() {
            return Money::ZERO;
        }
        balance.simple_interest(annual_rate, days, self.year_basis)
    }

    /// compute ledger rows and summary for one arrangement's operations
    ///
    /// Operations are ordered by date with a stable sort, so entries sharing a
    /// date keep their input order. The input is never mutated.
    pub fn compute<T: CashFlow>(&self, base_rate: Rate, operations: &[T]) -> Ledger {
        let mut ordered: Vec<&T> = operations.iter().collect();
        ordered.sort_by_key(|op| op.date());

        let mut balance = Money::ZERO;
        let mut previous_date: Option<NaiveDate> = None;
        let mut total_interest = Money::ZERO;
        let mut total_deposits = Money::ZERO;
        let mut total_repayments = Money::ZERO;
        let mut rows = Vec::with_capacity(ordered.len());

        for (position, op) in ordered.iter().enumerate() {
            let date = op.date();
            let days = previous_date.map_or(0, |prev| elapsed_days(prev, date));
            let balance_before = balance;
            let effective_rate = op.rate_override().unwrap_or(base_rate);

            let interest = self.period_interest(balance_before, effective_rate, days);
            total_interest = total_interest.saturating_add(interest);

            let amount = op.amount();
            match op.kind() {
                OperationType::Deposit => {
                    balance = balance.saturating_add(amount);
                    total_deposits = total_deposits.saturating_add(amount);
                }
                OperationType::Repayment => {
                    // overpayment is absorbed, balance never goes negative
                    balance = balance.saturating_sub(amount);
                    total_repayments = total_repayments.saturating_add(amount);
                }
            }

            rows.push(LedgerRow {
                index: position + 1,
                date,
                kind: op.kind(),
                amount,
                balance_before,
                elapsed_days: days,
                effective_rate,
                interest,
                balance_after: balance,
                note: op.note().to_string(),
            });

            previous_date = Some(date);
        }

        let period = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => Some(LedgerPeriod {
                from: first.date,
                to: last.date,
            }),
            _ => None,
        };

        debug!(
            operations = rows.len(),
            final_balance = %balance,
            total_interest = %total_interest,
            "ledger computed"
        );

        Ledger {
            summary: LedgerSummary {
                total_deposits,
                total_repayments,
                final_balance: balance,
                total_interest,
                period,
                operations_count: rows.len(),
            },
            rows,
        }
    }
}

/// whole days from `start` to `end`, clamped at zero
pub fn elapsed_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// compute a ledger with the default 365-day engine
pub fn compute_ledger<T: CashFlow>(base_rate: Rate, operations: &[T]) -> Ledger {
    AccrualEngine::new().compute(base_rate, operations)
}
