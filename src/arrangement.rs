use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::requests::{ArrangementPatch, NewArrangement};
use crate::types::{ArrangementId, RecordId};

/// a tracked loan between a lender and a borrower ("investment")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LendingArrangement {
    pub id: ArrangementId,
    pub name: String,
    #[serde(default)]
    pub lender: String,
    #[serde(default)]
    pub borrower: String,
    pub base_rate: Rate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl LendingArrangement {
    /// create a new arrangement from validated input
    pub fn create(input: NewArrangement, default_status: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(),
            name: input.name,
            lender: input.lender,
            borrower: input.borrower,
            base_rate: input.base_rate,
            status: input.status.unwrap_or_else(|| default_status.to_string()),
            created_at: now,
        }
    }

    /// apply a validated partial update; id and created_at never change
    pub fn apply(&mut self, patch: ArrangementPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(lender) = patch.lender {
            self.lender = lender;
        }
        if let Some(borrower) = patch.borrower {
            self.borrower = borrower;
        }
        if let Some(rate) = patch.base_rate {
            self.base_rate = rate;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    /// "lender → borrower"
    pub fn parties(&self) -> String {
        format!("{} → {}", self.lender, self.borrower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample() -> LendingArrangement {
        LendingArrangement::create(
            NewArrangement {
                name: "Mieszkanie".to_string(),
                lender: "Anna".to_string(),
                borrower: "Piotr".to_string(),
                base_rate: Rate::from_percentage(12),
                status: None,
            },
            "active",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_create_uses_default_status() {
        let arrangement = sample();
        assert_eq!(arrangement.status, "active");
        assert_eq!(arrangement.parties(), "Anna → Piotr");
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut arrangement = sample();
        let id = arrangement.id.clone();
        let created_at = arrangement.created_at;

        arrangement.apply(ArrangementPatch {
            base_rate: Some(Rate::from_percent(dec!(-1.5))),
            status: Some("closed".to_string()),
            ..Default::default()
        });

        assert_eq!(arrangement.id, id);
        assert_eq!(arrangement.created_at, created_at);
        assert_eq!(arrangement.base_rate, Rate::from_percent(dec!(-1.5)));
        assert_eq!(arrangement.status, "closed");
        assert_eq!(arrangement.name, "Mieszkanie");
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["baseRate"], serde_json::json!(12.0));
        assert!(json.get("createdAt").is_some());
    }
}
