//! Monthly budget tracking.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time::YearMonth;
use crate::transaction::Transaction;

/// How close spending is to the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetLevel {
    /// Under 50% spent
    #[serde(rename = "safe")]
    Safe,
    /// 50% up to 80% spent
    #[serde(rename = "warning")]
    Warning,
    /// 80% or more spent, still within budget
    #[serde(rename = "danger")]
    Danger,
    /// Spending exceeds the budget
    #[serde(rename = "over")]
    Over,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget: Decimal,
    pub spent: Decimal,
    /// Share of the budget spent, rounded to two places; may exceed 100
    pub percentage: Decimal,
    /// Negative once over budget
    pub remaining: Decimal,
    pub level: BudgetLevel,
}

impl BudgetStatus {
    /// Compare `spent` against `budget`. Returns `None` when no positive budget is set.
    pub fn evaluate(budget: Decimal, spent: Decimal) -> Option<Self> {
        if budget <= Decimal::ZERO {
            return None;
        }

        // Saturates when a tiny budget meets large spending.
        let share = spent
            .checked_div(budget)
            .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX);
        let remaining = budget.saturating_sub(spent);
        let level = if remaining < Decimal::ZERO {
            BudgetLevel::Over
        } else if share < Decimal::from(50) {
            BudgetLevel::Safe
        } else if share < Decimal::from(80) {
            BudgetLevel::Warning
        } else {
            BudgetLevel::Danger
        };

        Some(Self {
            budget,
            spent,
            percentage: share.round_dp(2),
            remaining,
            level,
        })
    }

    /// Progress bar fill, capped at 100
    pub fn progress(&self) -> Decimal {
        self.percentage.min(Decimal::ONE_HUNDRED)
    }
}

/// Total expenses dated within `month`.
pub fn month_expenses(transactions: &[Transaction], month: YearMonth) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.is_expense() && month.contains(t.date))
        .map(|t| t.amount)
        .sum()
}
