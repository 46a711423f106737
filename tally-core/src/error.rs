//! Error types raised by the core.

use crate::transaction::TransactionId;

/// Reasons raw form input can be rejected.
///
/// Every variant is recoverable: nothing is committed when normalization
/// fails, so the caller can re-prompt for the offending field.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// The amount is empty, not a decimal number, negative, or above the maximum.
    #[error("invalid amount '{0}': expected a non-negative decimal number up to 1000000000000")]
    InvalidAmount(String),

    /// The type is neither `income` nor `expense`.
    #[error("invalid transaction type '{0}': expected 'income' or 'expense'")]
    InvalidType(String),

    /// The date is not a real calendar date written as `YYYY-MM-DD`.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A required field was empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Errors raised by [`crate::store::TransactionStore`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with this id is already stored.
    #[error("a transaction with id {0} already exists")]
    DuplicateId(TransactionId),

    #[error("could not access the transaction file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not (de)serialize transactions: {0}")]
    Serialize(String),
}

/// Errors raised while interpreting calendar input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TimeError {
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),
}
