//! Spending insights: per-category totals and month-over-month changes.

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time::YearMonth;
use crate::transaction::Transaction;

/// Changes at or below this many percent are not worth reporting.
pub const CHANGE_THRESHOLD_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Spending in one category this month versus last month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChange {
    pub category: String,
    pub last_month: Decimal,
    pub this_month: Decimal,
    /// Positive for an increase, rounded to two places
    pub percent_change: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthComparison {
    pub biggest_increase: Option<CategoryChange>,
    pub biggest_decrease: Option<CategoryChange>,
}

impl MonthComparison {
    pub fn is_unchanged(&self) -> bool {
        self.biggest_increase.is_none() && self.biggest_decrease.is_none()
    }
}

/// Expense totals per category, largest first (ties broken by name).
pub fn category_totals<'a, I>(transactions: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: Vec<CategoryTotal> = totals_by_category(transactions)
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();

    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    totals
}

/// The `n` categories with the highest spending in `year`.
pub fn top_categories(transactions: &[Transaction], year: i32, n: usize) -> Vec<CategoryTotal> {
    let mut totals = category_totals(transactions.iter().filter(|t| t.date.year() == year));
    totals.truncate(n);
    totals
}

/// Compare each category's spending in `this_month` with the month before.
///
/// Only categories spent on in both months are compared, and a change is only
/// reported when it exceeds [`CHANGE_THRESHOLD_PERCENT`].
pub fn month_over_month(transactions: &[Transaction], this_month: YearMonth) -> MonthComparison {
    let last_month = this_month.previous();
    let current = totals_by_category(transactions.iter().filter(|t| this_month.contains(t.date)));
    let previous = totals_by_category(transactions.iter().filter(|t| last_month.contains(t.date)));

    let mut changes: Vec<CategoryChange> = current
        .into_iter()
        .filter_map(|(category, this_total)| {
            let last_total = previous.get(category).copied()?;
            if last_total.is_zero() {
                return None;
            }
            // A change too large to represent is not reported.
            let percent = (this_total - last_total)
                .checked_div(last_total)?
                .checked_mul(Decimal::ONE_HUNDRED)?
                .round_dp(2);
            Some(CategoryChange {
                category: category.to_string(),
                last_month: last_total,
                this_month: this_total,
                percent_change: percent,
            })
        })
        .collect();

    // Deterministic pick among equal changes
    changes.sort_by(|a, b| a.category.cmp(&b.category));

    let biggest_increase = changes
        .iter()
        .filter(|c| c.percent_change > CHANGE_THRESHOLD_PERCENT)
        .max_by(|a, b| a.percent_change.cmp(&b.percent_change).then_with(|| b.category.cmp(&a.category)))
        .cloned();
    let biggest_decrease = changes
        .iter()
        .filter(|c| c.percent_change < -CHANGE_THRESHOLD_PERCENT)
        .min_by(|a, b| a.percent_change.cmp(&b.percent_change).then_with(|| a.category.cmp(&b.category)))
        .cloned();

    MonthComparison {
        biggest_increase,
        biggest_decrease,
    }
}

fn totals_by_category<'a, I>(transactions: I) -> HashMap<&'a str, Decimal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for t in transactions.into_iter().filter(|t| t.is_expense()) {
        *totals.entry(t.category_or_default()).or_insert(Decimal::ZERO) += t.amount;
    }
    totals
}
