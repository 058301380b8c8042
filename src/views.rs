//! serializable views over arrangements and their computed ledgers
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::arrangement::LendingArrangement;
use crate::decimal::{Money, Rate};
use crate::interest::{Ledger, LedgerPeriod, LedgerRow, LedgerSummary};

/// aggregate view returned by the summary call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub arrangement: LendingArrangement,
    pub total_deposits: Money,
    pub total_repayments: Money,
    pub final_balance: Money,
    pub total_interest: Money,
    /// "YYYY-MM-DD → YYYY-MM-DD", absent when there are no operations
    pub period: Option<String>,
    pub operations_count: usize,
}

impl SummaryView {
    pub fn new(arrangement: LendingArrangement, summary: &LedgerSummary) -> Self {
        Self {
            arrangement,
            total_deposits: summary.total_deposits,
            total_repayments: summary.total_repayments,
            final_balance: summary.final_balance,
            total_interest: summary.total_interest,
            period: summary.period.as_ref().map(period_label),
            operations_count: summary.operations_count,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// per-operation table plus summary for one arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerView {
    pub arrangement: LendingArrangement,
    pub rows: Vec<LedgerRow>,
    pub summary: LedgerSummary,
}

impl LedgerView {
    pub fn new(arrangement: LendingArrangement, ledger: Ledger) -> Self {
        Self {
            arrangement,
            rows: ledger.rows,
            summary: ledger.summary,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// plain-text table in the layout of the polish ledger screen
    pub fn render_table(&self) -> String {
        let mut out = format!(
            "{}\n{} • {}% rocznie\n\n",
            self.arrangement.name,
            self.arrangement.parties(),
            format_rate(self.arrangement.base_rate)
        );
        out.push_str(&table_line([
            "#",
            "Data",
            "Typ",
            "Kwota",
            "Saldo przed",
            "Dni",
            "Stopa",
            "Odsetki",
            "Saldo po",
            "Notatka",
        ]));
        for row in &self.rows {
            out.push_str(&table_line([
                &row.index.to_string(),
                &row.date.format("%Y-%m-%d").to_string(),
                row.kind.display_label(),
                &format_money(row.amount),
                &format_money(row.balance_before),
                &row.elapsed_days.to_string(),
                &format_rate(row.effective_rate),
                &format_money(row.interest),
                &format_money(row.balance_after),
                &row.note,
            ]));
        }
        out
    }
}

fn table_line(cells: [&str; 10]) -> String {
    let [index, date, kind, amount, before, days, rate, interest, after, note] = cells;
    format!(
        "{:>3} | {:<10} | {:<7} | {:>16} | {:>16} | {:>4} | {:>6} | {:>14} | {:>16} | {}\n",
        index, date, kind, amount, before, days, rate, interest, after, note
    )
}

/// "2024-01-01 → 2024-07-01"
pub fn period_label(period: &LedgerPeriod) -> String {
    format!(
        "{} → {}",
        period.from.format("%Y-%m-%d"),
        period.to.format("%Y-%m-%d")
    )
}

/// polish money format: two decimals, comma separator, grouped thousands
///
/// Grouping starts at five integer digits ("1234,56 zł", "12 345,67 zł"), with a
/// no-break space between groups.
pub fn format_money(value: Money) -> String {
    format!("{} zł", format_decimal_pl(value.as_decimal()))
}

/// rate as shown in tables, e.g. "12,00"
pub fn format_rate(rate: Rate) -> String {
    let rounded = rate
        .as_percentage()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded).replace('.', ",")
}

fn format_decimal_pl(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let grouped = if int_part.len() >= 5 {
        let digits: Vec<char> = int_part.chars().collect();
        let mut out = String::new();
        for (i, ch) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('\u{a0}');
            }
            out.push(*ch);
        }
        out
    } else {
        int_part.to_string()
    };

    format!("{}{},{}", if negative { "-" } else { "" }, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use crate::interest::compute_ledger;
    use crate::operation::CashFlowOperation;
    use crate::requests::NewArrangement;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Money::ZERO), "0,00 zł");
        assert_eq!(format_money(Money::from_str_exact("59.835616").unwrap()), "59,84 zł");
        assert_eq!(format_money(Money::from_major(1_234)), "1234,00 zł");
        assert_eq!(format_money(Money::from_major(12_345)), "12\u{a0}345,00 zł");
        assert_eq!(
            format_money(Money::from_str_exact("1234567.891").unwrap()),
            "1\u{a0}234\u{a0}567,89 zł"
        );
        assert_eq!(format_money(Money::from_decimal(dec!(-0.5))), "-0,50 zł");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Rate::from_percentage(12)), "12,00");
        assert_eq!(format_rate(Rate::from_percent(dec!(7.125))), "7,13");
    }

    #[test]
    fn test_summary_view_period_label() {
        let arrangement = LendingArrangement::create(
            NewArrangement {
                name: "Test".to_string(),
                lender: String::new(),
                borrower: String::new(),
                base_rate: Rate::from_percentage(12),
                status: None,
            },
            "active",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );

        let empty = compute_ledger::<CashFlowOperation>(arrangement.base_rate, &[]);
        let view = SummaryView::new(arrangement.clone(), &empty.summary);
        assert_eq!(view.period, None);
        assert_eq!(view.operations_count, 0);

        let period = LedgerPeriod {
            from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        };
        assert_eq!(period_label(&period), "2024-01-01 → 2024-07-01");

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("totalInterest").is_some());
        assert!(json["period"].is_null());
    }
}
