//! Builds canonical [`Transaction`] records from raw form input.
//!
//! The form is captured once, at submit time, as an immutable
//! [`RawTransaction`]. Normalization validates every field and derives the
//! display-safe ones:
//!
//! - income always gets `category = None`, whatever the form held
//! - expenses must carry a non-empty category
//! - `title` is `"Income"` for income and the category for expenses

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;
use crate::ids::IdSource;
use crate::transaction::{INCOME_LABEL, Transaction, TransactionType};

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern is valid"));

static AMOUNT_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?$").expect("amount pattern is valid")
});

/// Form state as typed by the user, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount_text: String,
    pub category: Option<String>,
    pub payment_method: String,
    pub date: String,
    pub description: Option<String>,
}

impl RawTransaction {
    pub fn expense(
        amount_text: impl Into<String>,
        category: impl Into<String>,
        payment_method: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            kind: "expense".to_string(),
            amount_text: amount_text.into(),
            category: Some(category.into()),
            payment_method: payment_method.into(),
            date: date.into(),
            description: None,
        }
    }

    pub fn income(
        amount_text: impl Into<String>,
        payment_method: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            kind: "income".to_string(),
            amount_text: amount_text.into(),
            category: None,
            payment_method: payment_method.into(),
            date: date.into(),
            description: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Validate `raw` and build a fresh [`Transaction`] with an id from `ids`.
pub fn normalize(raw: &RawTransaction, ids: &impl IdSource) -> Result<Transaction, NormalizeError> {
    let record = validate(raw).inspect_err(|e| {
        tracing::debug!(error = %e, "rejected transaction input");
    })?;

    let title = match record.kind {
        TransactionType::Income => INCOME_LABEL.to_string(),
        TransactionType::Expense => record.category.clone().unwrap_or_default(),
    };

    Ok(Transaction {
        id: ids.next_id(),
        amount: record.amount,
        category: record.category,
        payment_method: record.payment_method,
        kind: record.kind,
        date: record.date,
        description: record.description,
        title: Some(title),
    })
}

struct Validated {
    kind: TransactionType,
    amount: Decimal,
    category: Option<String>,
    payment_method: String,
    date: NaiveDate,
    description: String,
}

fn validate(raw: &RawTransaction) -> Result<Validated, NormalizeError> {
    let kind = TransactionType::from_str(&raw.kind)
        .map_err(|_| NormalizeError::InvalidType(raw.kind.clone()))?;
    let amount = parse_amount(&raw.amount_text)?;

    let payment_method = raw.payment_method.trim();
    if payment_method.is_empty() {
        return Err(NormalizeError::MissingField("paymentMethod"));
    }

    let date = parse_date(&raw.date)?;

    // Income discards whatever category the form still held.
    let category = match kind {
        TransactionType::Income => None,
        TransactionType::Expense => {
            let category = raw.category.as_deref().map(str::trim).unwrap_or("");
            if category.is_empty() {
                return Err(NormalizeError::MissingField("category"));
            }
            Some(category.to_string())
        }
    };

    Ok(Validated {
        kind,
        amount,
        category,
        payment_method: payment_method.to_string(),
        date,
        description: raw.description.as_deref().map(str::trim).unwrap_or("").to_string(),
    })
}

/// Largest accepted amount, one trillion.
///
/// Keeps sums over any realistic collection far from `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Parse a non-negative decimal amount such as `12.50` or `500`, at most [`MAX_AMOUNT`].
pub fn parse_amount(text: &str) -> Result<Decimal, NormalizeError> {
    let invalid = || NormalizeError::InvalidAmount(text.to_string());
    let trimmed = text.trim();
    if !AMOUNT_SHAPE.is_match(trimmed) {
        return Err(invalid());
    }

    let amount = Decimal::from_str(trimmed.trim_start_matches('+')).map_err(|_| invalid())?;
    if (amount.is_sign_negative() && !amount.is_zero()) || amount > MAX_AMOUNT {
        return Err(invalid());
    }
    // Drops the sign of "-0".
    Ok(amount.abs())
}

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(text: &str) -> Result<NaiveDate, NormalizeError> {
    let trimmed = text.trim();
    if !DATE_SHAPE.is_match(trimmed) {
        return Err(NormalizeError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| NormalizeError::InvalidDate(text.to_string()))
}
