//! Display rules shared by the list and dashboard views.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::transaction::{INCOME_LABEL, Transaction, TransactionType};

/// Bangladeshi taka, the glyph used when none is configured
pub const DEFAULT_CURRENCY_GLYPH: &str = "৳";

/// Render a money value with two fraction digits, e.g. `৳350.00` or `-৳20.00`.
pub fn format_amount(amount: Decimal, glyph: &str) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{sign}{glyph}{}", two_places(amount.abs()))
}

/// Render a transaction amount with its direction, e.g. `+৳500.00` or `-৳150.00`.
pub fn format_signed(t: &Transaction) -> String {
    format_signed_with(t, DEFAULT_CURRENCY_GLYPH)
}

pub fn format_signed_with(t: &Transaction, glyph: &str) -> String {
    format!("{}{glyph}{}", t.kind.sign(), two_places(t.amount))
}

/// Human-facing title of a transaction.
///
/// Uses the stored title when there is one; otherwise falls back to
/// `"Income"` or the expense category. Never fails, even on records that
/// were written without a title.
pub fn display_label(t: &Transaction) -> &str {
    if let Some(title) = t.title.as_deref().filter(|s| !s.trim().is_empty()) {
        return title;
    }
    match t.kind {
        TransactionType::Income => INCOME_LABEL,
        TransactionType::Expense => t.category_or_default(),
    }
}

fn two_places(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionId;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn txn(kind: TransactionType, amount: Decimal, category: Option<&str>, title: Option<&str>) -> Transaction {
        Transaction {
            id: TransactionId::new("t"),
            amount,
            category: category.map(str::to_string),
            payment_method: "Cash".to_string(),
            kind,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: String::new(),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_format_signed_income() {
        let t = txn(TransactionType::Income, dec!(500), None, Some("Income"));
        assert_eq!(format_signed(&t), "+৳500.00");
    }

    #[test]
    fn test_format_signed_expense() {
        let t = txn(TransactionType::Expense, dec!(150), Some("Food"), Some("Food"));
        assert_eq!(format_signed(&t), "-৳150.00");
    }

    #[test]
    fn test_format_signed_rounds_to_two_places() {
        let t = txn(TransactionType::Expense, dec!(12.345), Some("Food"), None);
        assert_eq!(format_signed(&t), "-৳12.35");
        let t = txn(TransactionType::Income, dec!(0.1), None, None);
        assert_eq!(format_signed_with(&t, "$"), "+$0.10");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(350), "৳"), "৳350.00");
        assert_eq!(format_amount(dec!(-20), "৳"), "-৳20.00");
        assert_eq!(format_amount(Decimal::ZERO, "$"), "$0.00");
        assert_eq!(format_amount(dec!(1234.5), "$"), "$1234.50");
    }

    #[test]
    fn test_display_label_prefers_title() {
        let t = txn(TransactionType::Expense, dec!(1), Some("Food"), Some("Lunch"));
        assert_eq!(display_label(&t), "Lunch");
    }

    #[test]
    fn test_display_label_falls_back() {
        let income = txn(TransactionType::Income, dec!(1), None, None);
        assert_eq!(display_label(&income), "Income");

        let expense = txn(TransactionType::Expense, dec!(1), Some("Rent"), Some(""));
        assert_eq!(display_label(&expense), "Rent");

        let malformed = txn(TransactionType::Expense, dec!(1), None, None);
        assert_eq!(display_label(&malformed), "Others");
    }
}
