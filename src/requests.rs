//! Boundary validation for loosely typed request bodies.
//!
//! Numbers may arrive as JSON numbers or as strings (`"12,5"` from a polish form);
//! every field is checked here so storage and the accrual engine only ever see
//! typed, well-formed values.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::Value;

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::operation::CashFlowOperation;
use crate::types::{OperationType, RateMode};

/// largest amount a single operation may carry
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// rates are accepted between `-MAX_RATE_PERCENT` and `MAX_RATE_PERCENT` per annum
pub const MAX_RATE_PERCENT: Decimal = dec!(1000);

/// raw body for creating or updating an arrangement
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrangementRequest {
    pub name: Option<String>,
    pub lender: Option<String>,
    pub borrower: Option<String>,
    pub base_rate: Option<Value>,
    pub status: Option<String>,
}

/// validated arrangement creation input
#[derive(Debug, Clone, PartialEq)]
pub struct NewArrangement {
    pub name: String,
    pub lender: String,
    pub borrower: String,
    pub base_rate: Rate,
    pub status: Option<String>,
}

/// validated partial arrangement update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrangementPatch {
    pub name: Option<String>,
    pub lender: Option<String>,
    pub borrower: Option<String>,
    pub base_rate: Option<Rate>,
    pub status: Option<String>,
}

impl ArrangementRequest {
    pub fn validate_new(&self) -> Result<NewArrangement> {
        let name = self
            .name
            .as_deref()
            .ok_or_else(|| LedgerError::validation("name", "name is required"))
            .and_then(validate_name)?;

        let base_rate = match &self.base_rate {
            Some(value) => parse_rate("baseRate", value)?,
            None => return Err(LedgerError::validation("baseRate", "baseRate must be a number")),
        };

        Ok(NewArrangement {
            name,
            lender: self.lender.clone().unwrap_or_default(),
            borrower: self.borrower.clone().unwrap_or_default(),
            base_rate,
            status: self.status.clone(),
        })
    }

    pub fn validate_patch(&self) -> Result<ArrangementPatch> {
        Ok(ArrangementPatch {
            name: self.name.as_deref().map(validate_name).transpose()?,
            lender: self.lender.clone(),
            borrower: self.borrower.clone(),
            base_rate: self
                .base_rate
                .as_ref()
                .map(|value| parse_rate("baseRate", value))
                .transpose()?,
            status: self.status.clone(),
        })
    }
}

/// raw body for creating or updating an operation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<Value>,
    pub rate_mode: Option<String>,
    pub custom_rate: Option<Value>,
    pub note: Option<String>,
    pub created_by: Option<String>,
}

/// validated operation creation input
#[derive(Debug, Clone, PartialEq)]
pub struct NewOperation {
    pub date: NaiveDate,
    pub kind: OperationType,
    pub amount: Money,
    pub rate_mode: RateMode,
    pub custom_rate: Option<Rate>,
    pub note: String,
    pub created_by: Option<String>,
}

/// validated partial operation update
///
/// Rate settings are always resolved against the current operation, so they are
/// carried as final values rather than options.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationPatch {
    pub date: Option<NaiveDate>,
    pub kind: Option<OperationType>,
    pub amount: Option<Money>,
    pub note: Option<String>,
    pub rate_mode: RateMode,
    pub custom_rate: Option<Rate>,
}

impl OperationPatch {
    /// a patch that leaves the operation untouched
    pub fn keeping(current: &CashFlowOperation) -> Self {
        Self {
            date: None,
            kind: None,
            amount: None,
            note: None,
            rate_mode: current.rate_mode,
            custom_rate: current.custom_rate,
        }
    }
}

impl OperationRequest {
    pub fn validate_new(&self) -> Result<NewOperation> {
        let date = match self.date.as_deref() {
            Some(raw) => parse_date(raw)?,
            None => return Err(LedgerError::validation("date", "date is required")),
        };
        let kind = match self.kind.as_deref() {
            Some(raw) => parse_kind(raw)?,
            None => return Err(kind_error()),
        };
        let amount = match &self.amount {
            Some(value) => parse_amount(value)?,
            None => return Err(amount_error()),
        };

        let rate_mode = self
            .rate_mode
            .as_deref()
            .map(RateMode::parse)
            .unwrap_or_default();
        let custom_rate = match rate_mode {
            RateMode::Custom => Some(parse_custom_rate(self.custom_rate.as_ref())?),
            RateMode::Global => None,
        };

        Ok(NewOperation {
            date,
            kind,
            amount,
            rate_mode,
            custom_rate,
            note: self.note.clone().unwrap_or_default(),
            created_by: self.created_by.clone().filter(|s| !s.is_empty()),
        })
    }

    pub fn validate_patch(&self, current: &CashFlowOperation) -> Result<OperationPatch> {
        let rate_mode = self
            .rate_mode
            .as_deref()
            .map(RateMode::parse)
            .unwrap_or(current.rate_mode);

        let custom_rate = match rate_mode {
            RateMode::Global => None,
            RateMode::Custom => match &self.custom_rate {
                Some(value) => Some(parse_custom_rate(Some(value))?),
                None => Some(current.custom_rate.ok_or_else(custom_rate_error)?),
            },
        };

        Ok(OperationPatch {
            date: self.date.as_deref().map(parse_date).transpose()?,
            kind: self.kind.as_deref().map(parse_kind).transpose()?,
            amount: self.amount.as_ref().map(parse_amount).transpose()?,
            note: self.note.clone(),
            rate_mode,
            custom_rate,
        })
    }
}

fn validate_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("name", "name is required"));
    }
    Ok(name.to_string())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LedgerError::validation("date", "date is required"));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        LedgerError::validation("date", "date must be an ISO-8601 date (YYYY-MM-DD)")
    })
}

fn parse_kind(raw: &str) -> Result<OperationType> {
    OperationType::parse(raw).ok_or_else(kind_error)
}

fn kind_error() -> LedgerError {
    LedgerError::validation("type", "type must be Deposit or Repayment")
}

fn amount_error() -> LedgerError {
    LedgerError::validation("amount", "amount must be a positive number")
}

fn parse_amount(value: &Value) -> Result<Money> {
    let amount = parse_decimal(value).ok_or_else(amount_error)?;
    if amount <= Decimal::ZERO {
        return Err(amount_error());
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::validation(
            "amount",
            format!("amount must not exceed {}", MAX_AMOUNT),
        ));
    }
    Ok(Money::from_decimal(amount))
}

fn parse_rate(field: &'static str, value: &Value) -> Result<Rate> {
    let percent = parse_decimal(value)
        .ok_or_else(|| LedgerError::validation(field, format!("{} must be a number", field)))?;
    rate_in_range(field, percent)
}

fn parse_custom_rate(value: Option<&Value>) -> Result<Rate> {
    let percent = value.and_then(parse_decimal).ok_or_else(custom_rate_error)?;
    rate_in_range("customRate", percent)
}

fn rate_in_range(field: &'static str, percent: Decimal) -> Result<Rate> {
    if percent.abs() > MAX_RATE_PERCENT {
        return Err(LedgerError::validation(
            field,
            format!(
                "{} must be between -{} and {}",
                field, MAX_RATE_PERCENT, MAX_RATE_PERCENT
            ),
        ));
    }
    Ok(Rate::from_percent(percent))
}

fn custom_rate_error() -> LedgerError {
    LedgerError::validation(
        "customRate",
        "customRate must be a number when rateMode is custom",
    )
}

/// numbers, or strings holding a number with either decimal separator
fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => {
            let text = s.trim().replace(',', ".");
            if text.is_empty() {
                return None;
            }
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        _ => None,
    }
}
