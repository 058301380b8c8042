use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::interest::CashFlow;
use crate::requests::{NewOperation, OperationPatch};
use crate::types::{ArrangementId, OperationId, OperationType, RateMode, RecordId};

/// a dated deposit or repayment against one arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowOperation {
    pub id: OperationId,
    #[serde(alias = "investmentId")]
    pub arrangement_id: ArrangementId,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: OperationType,
    pub amount: Money,
    #[serde(default)]
    pub rate_mode: RateMode,
    #[serde(default)]
    pub custom_rate: Option<Rate>,
    #[serde(default)]
    pub note: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl CashFlowOperation {
    /// create a new operation attached to an arrangement
    pub fn create(
        arrangement_id: ArrangementId,
        input: NewOperation,
        default_created_by: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            arrangement_id,
            date: input.date,
            kind: input.kind,
            amount: input.amount,
            rate_mode: input.rate_mode,
            custom_rate: input.custom_rate,
            note: input.note,
            created_by: input
                .created_by
                .unwrap_or_else(|| default_created_by.to_string()),
            created_at: now,
        }
    }

    /// apply a validated partial update
    pub fn apply(&mut self, patch: OperationPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }

        self.rate_mode = patch.rate_mode;
        self.custom_rate = match patch.rate_mode {
            RateMode::Custom => patch.custom_rate,
            RateMode::Global => None,
        };
    }
}

impl CashFlow for CashFlowOperation {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn kind(&self) -> OperationType {
        self.kind
    }

    fn amount(&self) -> Money {
        self.amount
    }

    fn rate_override(&self) -> Option<Rate> {
        match self.rate_mode {
            RateMode::Custom => self.custom_rate,
            RateMode::Global => None,
        }
    }

    fn note(&self) -> &str {
        &self.note
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn deposit(custom_rate: Option<Rate>) -> CashFlowOperation {
        CashFlowOperation::create(
            RecordId::from("inv_ab12cd34"),
            NewOperation {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                kind: OperationType::Deposit,
                amount: Money::from_major(1_000),
                rate_mode: if custom_rate.is_some() { RateMode::Custom } else { RateMode::Global },
                custom_rate,
                note: String::new(),
                created_by: None,
            },
            "system",
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_create_defaults_author() {
        let op = deposit(None);
        assert_eq!(op.created_by, "system");
        assert_eq!(op.rate_override(), None);
    }

    #[test]
    fn test_switching_to_global_clears_custom_rate() {
        let mut op = deposit(Some(Rate::from_percentage(5)));
        assert_eq!(op.rate_override(), Some(Rate::from_percentage(5)));

        op.apply(OperationPatch {
            rate_mode: RateMode::Global,
            custom_rate: Some(Rate::from_percentage(5)),
            ..OperationPatch::keeping(&op)
        });

        assert_eq!(op.rate_mode, RateMode::Global);
        assert_eq!(op.custom_rate, None);
    }

    #[test]
    fn test_reads_legacy_store_layout() {
        let raw = serde_json::json!({
            "id": "op_zz99yy88",
            "investmentId": "inv_ab12cd34",
            "date": "2024-07-01",
            "type": "Splata",
            "amount": 200,
            "rateMode": "global",
            "customRate": null,
            "note": "",
            "createdBy": "demo-user",
            "createdAt": "2024-07-01T10:00:00.000Z"
        });

        let op: CashFlowOperation = serde_json::from_value(raw).unwrap();
        assert_eq!(op.id.as_str(), "op_zz99yy88");
        assert_eq!(op.arrangement_id, RecordId::from("inv_ab12cd34"));
        assert_eq!(op.kind, OperationType::Repayment);
        assert_eq!(op.amount, Money::from_major(200));
        assert_eq!(op.date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }
}
