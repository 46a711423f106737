//! Month/category filters for the transaction list.

use crate::time::YearMonth;
use crate::transaction::{Transaction, TransactionType};

/// Criteria for narrowing the transaction list. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub month: Option<YearMonth>,
    /// Exact category name; expenses without a category match "Others"
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_month(mut self, month: YearMonth) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, t: &Transaction) -> bool {
        if let Some(month) = &self.month {
            if !month.contains(t.date) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if t.kind != kind {
                return false;
            }
        }
        if let Some(category) = &self.category {
            // Income has no category; it never matches a category filter.
            if t.is_income() || t.category_or_default() != category {
                return false;
            }
        }
        true
    }

    /// Keep the matching records, preserving their order.
    pub fn apply<'a, I>(&self, transactions: I) -> Vec<&'a Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions.into_iter().filter(|t| self.matches(t)).collect()
    }
}

/// Sort newest date first. Records on the same date keep their insertion order.
pub fn newest_first(transactions: &mut [&Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}
