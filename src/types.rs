use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// opaque record identifier
///
/// New records get a v4 uuid; ids read from an existing store (e.g. `inv_ab12cd34`)
/// are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

/// unique identifier for a lending arrangement
pub type ArrangementId = RecordId;

/// unique identifier for a cash-flow operation
pub type OperationId = RecordId;

/// default arrangement status
pub const DEFAULT_STATUS: &str = "active";

/// default author recorded on operations
pub const DEFAULT_CREATED_BY: &str = "system";

/// direction of a cash movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    /// principal paid out to the borrower ("Wplata")
    #[serde(alias = "Wplata")]
    Deposit,
    /// principal paid back by the borrower ("Splata")
    #[serde(alias = "Splata")]
    Repayment,
}

impl OperationType {
    /// parse a wire label, accepting the legacy polish labels
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Deposit" | "Wplata" => Some(OperationType::Deposit),
            "Repayment" | "Splata" => Some(OperationType::Repayment),
            _ => None,
        }
    }

    /// label used by the polish ledger table
    pub fn display_label(&self) -> &'static str {
        match self {
            OperationType::Deposit => "Wpłata",
            OperationType::Repayment => "Spłata",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Deposit => write!(f, "Deposit"),
            OperationType::Repayment => write!(f, "Repayment"),
        }
    }
}

/// which rate an operation accrues at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateMode {
    /// use the arrangement's base rate
    #[default]
    #[serde(alias = "Global")]
    Global,
    /// use the operation's own custom rate
    #[serde(alias = "Custom")]
    Custom,
}

impl RateMode {
    /// anything other than "custom" falls back to the global rate
    pub fn parse(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("custom") {
            RateMode::Custom
        } else {
            RateMode::Global
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_labels() {
        assert_eq!(OperationType::parse("Wplata"), Some(OperationType::Deposit));
        assert_eq!(OperationType::parse("Splata"), Some(OperationType::Repayment));
        assert_eq!(OperationType::parse("Repayment"), Some(OperationType::Repayment));
        assert_eq!(OperationType::parse("Withdrawal"), None);

        let kind: OperationType = serde_json::from_str("\"Wplata\"").unwrap();
        assert_eq!(kind, OperationType::Deposit);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"Deposit\"");
    }

    #[test]
    fn test_record_ids_are_opaque() {
        let legacy: RecordId = serde_json::from_str("\"inv_ab12cd34\"").unwrap();
        assert_eq!(legacy.as_str(), "inv_ab12cd34");
        assert_eq!(serde_json::to_string(&legacy).unwrap(), "\"inv_ab12cd34\"");

        let fresh = RecordId::new();
        assert!(Uuid::parse_str(fresh.as_str()).is_ok());
        assert_ne!(fresh, RecordId::new());
    }

    #[test]
    fn test_rate_mode_parsing() {
        assert_eq!(RateMode::parse("custom"), RateMode::Custom);
        assert_eq!(RateMode::parse("Custom"), RateMode::Custom);
        assert_eq!(RateMode::parse("global"), RateMode::Global);
        assert_eq!(RateMode::parse("anything"), RateMode::Global);
        assert_eq!(RateMode::default(), RateMode::Global);
    }
}
