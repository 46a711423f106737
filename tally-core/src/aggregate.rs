//! Dashboard totals over a transaction collection.
//!
//! Amounts are summed as exact decimals, so the result does not depend on the
//! order of the input.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionType};

/// Point-in-time totals derived from a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`; negative when spending exceeds income
    pub total_balance: Decimal,
}

impl AggregateSnapshot {
    pub fn new(total_income: Decimal, total_expenses: Decimal) -> Self {
        Self {
            total_income,
            total_expenses,
            total_balance: total_income - total_expenses,
        }
    }

    /// Sum two snapshots field by field.
    pub fn combine(self, other: Self) -> Self {
        Self::new(
            self.total_income + other.total_income,
            self.total_expenses + other.total_expenses,
        )
    }
}

impl Add for AggregateSnapshot {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.combine(rhs)
    }
}

impl Sum for AggregateSnapshot {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Self::combine)
    }
}

/// Compute income, expense and balance totals.
pub fn compute_totals<'a, I>(transactions: I) -> AggregateSnapshot
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (income, expenses) = transactions.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expenses), t| match t.kind {
            TransactionType::Income => (income + t.amount, expenses),
            TransactionType::Expense => (income, expenses + t.amount),
        },
    );
    AggregateSnapshot::new(income, expenses)
}
