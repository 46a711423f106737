//! tally-core: transaction model, normalization and dashboard aggregation for Tally

pub mod aggregate;
pub mod budget;
pub mod display;
pub mod error;
pub mod filter;
pub mod ids;
pub mod insights;
pub mod normalize;
pub mod store;
pub mod time;
pub mod transaction;

pub use aggregate::{AggregateSnapshot, compute_totals};
pub use budget::{BudgetLevel, BudgetStatus, month_expenses};
pub use display::{DEFAULT_CURRENCY_GLYPH, display_label, format_amount, format_signed, format_signed_with};
pub use error::{NormalizeError, StoreError, TimeError};
pub use filter::{TransactionFilter, newest_first};
pub use ids::{ClockIds, IdSource, UuidIds};
pub use insights::{CategoryChange, CategoryTotal, MonthComparison, category_totals, month_over_month, top_categories};
pub use normalize::{MAX_AMOUNT, RawTransaction, normalize};
pub use store::{MemoryStore, TransactionStore};
pub use time::{YearMonth, today_in};
pub use transaction::{INCOME_LABEL, Transaction, TransactionId, TransactionType, UNCATEGORIZED_LABEL};
