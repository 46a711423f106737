//! JSON backup export and import.
//!
//! A backup is a pretty-printed envelope:
//!
//! ```json
//! { "exportDate": "...", "version": 1, "transactionCount": 3, "transactions": [ ... ] }
//! ```
//!
//! Imports also accept a bare JSON array of transactions, which is what the
//! web front-end keeps in local storage.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{
    IdSource, MAX_AMOUNT, NormalizeError, StoreError, Transaction, TransactionId, TransactionStore,
};

/// Current envelope version. Newer versions are rejected on import.
pub const BACKUP_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("could not read or write backup JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read or write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The backup was written by a newer version of the format.
    #[error("unsupported backup version {0}")]
    UnsupportedVersion(u32),

    /// The CSV header lacks a required column.
    #[error("CSV is missing the '{0}' column")]
    MissingColumn(&'static str),

    /// A CSV row failed validation. `line` is 1-based and counts the header.
    #[error("invalid row on line {line}: {source}")]
    Row { line: u64, source: NormalizeError },

    /// A restored record breaks a record invariant.
    #[error("invalid record {id}: {reason}")]
    InvalidRecord { id: TransactionId, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// On-disk backup envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub export_date: DateTime<Utc>,
    pub version: u32,
    pub transaction_count: usize,
    pub transactions: Vec<Transaction>,
}

impl BackupData {
    pub fn new(transactions: Vec<Transaction>, now: DateTime<Utc>) -> Self {
        Self {
            export_date: now,
            version: BACKUP_VERSION,
            transaction_count: transactions.len(),
            transactions,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BackupFile {
    Envelope(BackupData),
    Bare(Vec<Transaction>),
}

/// Serialize `transactions` as a pretty-printed backup envelope.
pub fn export_json(transactions: &[Transaction], now: DateTime<Utc>) -> Result<String, BackupError> {
    let data = BackupData::new(transactions.to_vec(), now);
    Ok(serde_json::to_string_pretty(&data)?)
}

/// Parse a backup envelope (or a bare array of records).
pub fn import_json(text: &str) -> Result<Vec<Transaction>, BackupError> {
    let transactions = match serde_json::from_str::<BackupFile>(text)? {
        BackupFile::Envelope(data) => {
            if data.version > BACKUP_VERSION {
                return Err(BackupError::UnsupportedVersion(data.version));
            }
            if data.transaction_count != data.transactions.len() {
                tracing::warn!(
                    declared = data.transaction_count,
                    found = data.transactions.len(),
                    "backup transaction count does not match its contents"
                );
            }
            tracing::debug!(
                count = data.transactions.len(),
                exported = %data.export_date.format("%Y-%m-%d %H:%M:%S"),
                "read backup"
            );
            data.transactions
        }
        BackupFile::Bare(transactions) => transactions,
    };

    transactions.into_iter().map(repair).collect()
}

/// Restore records into `store`, giving a fresh id to any record whose id is
/// already taken. The batch is committed with a single
/// [`TransactionStore::insert_many`]. Returns the number of records inserted.
pub fn restore_into<S, I>(store: &mut S, transactions: Vec<Transaction>, ids: &I) -> Result<usize, BackupError>
where
    S: TransactionStore + ?Sized,
    I: IdSource,
{
    let mut taken: HashSet<TransactionId> = store.list_all()?.into_iter().map(|t| t.id).collect();
    let mut batch = Vec::with_capacity(transactions.len());
    for mut t in transactions {
        while taken.contains(&t.id) {
            let fresh = ids.next_id();
            tracing::debug!(old = %t.id, new = %fresh, "re-keyed colliding transaction");
            t.id = fresh;
        }
        taken.insert(t.id.clone());
        batch.push(t);
    }

    let count = batch.len();
    store.insert_many(batch)?;
    tracing::info!(count, "restored transactions");
    Ok(count)
}

/// Default file name for a backup taken at `now`, e.g. `expense_backup_20240301_093000.json`.
pub fn backup_filename(now: DateTime<Utc>) -> String {
    format!("expense_backup_{}.json", now.format("%Y%m%d_%H%M%S"))
}

fn repair(mut t: Transaction) -> Result<Transaction, BackupError> {
    if t.amount.is_sign_negative() && !t.amount.is_zero() {
        return Err(BackupError::InvalidRecord {
            id: t.id,
            reason: format!("negative amount {}", t.amount),
        });
    }
    if t.amount > MAX_AMOUNT {
        return Err(BackupError::InvalidRecord {
            id: t.id,
            reason: format!("amount {} exceeds {}", t.amount, MAX_AMOUNT),
        });
    }
    if t.is_expense() && t.category.as_deref().is_none_or(|c| c.trim().is_empty()) {
        return Err(BackupError::InvalidRecord {
            id: t.id,
            reason: "expense without a category".to_string(),
        });
    }
    if t.is_income() && t.category.is_some() {
        tracing::warn!(id = %t.id, "dropping category from income record");
        t.category = None;
    }
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use tally_core::{ClockIds, MemoryStore, RawTransaction, normalize};

    fn sample() -> Vec<Transaction> {
        let ids = ClockIds::new();
        vec![
            normalize(&RawTransaction::income("500", "Bank", "2024-03-02"), &ids).unwrap(),
            normalize(
                &RawTransaction::expense("12.50", "Food", "Cash", "2024-03-01").with_description("lunch"),
                &ids,
            )
            .unwrap(),
        ]
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_export_envelope() {
        let json = export_json(&sample(), now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["transactionCount"], 2);
        assert_eq!(value["exportDate"], "2024-03-01T09:30:00Z");
        assert_eq!(value["transactions"][1]["title"], "Food");
    }

    #[test]
    fn test_import_restores_export() {
        let txns = sample();
        let json = export_json(&txns, now()).unwrap();
        assert_eq!(import_json(&json).unwrap(), txns);
    }

    #[test]
    fn test_import_bare_array_from_web() {
        let json = r#"[
            {"id":"1709251200000","amount":500,"category":null,"paymentMethod":"Bank",
             "type":"income","date":"2024-03-02","description":""},
            {"id":"1709251200001","amount":12.5,"category":"Food","paymentMethod":"Cash",
             "type":"expense","date":"2024-03-01","description":"","title":"Food"}
        ]"#;
        let txns = import_json(json).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].title, None);
        assert_eq!(txns[1].amount, dec!(12.5));
    }

    #[test]
    fn test_newer_version_rejected() {
        let json = r#"{"exportDate":"2024-03-01T09:30:00Z","version":2,"transactionCount":0,"transactions":[]}"#;
        assert!(matches!(import_json(json), Err(BackupError::UnsupportedVersion(2))));
    }

    #[test]
    fn test_income_category_dropped_on_import() {
        let json = r#"[{"id":"1","amount":"5","category":"Salary","paymentMethod":"Bank",
                        "type":"income","date":"2024-03-02"}]"#;
        let txns = import_json(json).unwrap();
        assert_eq!(txns[0].category, None);
    }

    #[test]
    fn test_negative_amount_rejected_on_import() {
        let json = r#"[{"id":"1","amount":"-5","category":"Food","paymentMethod":"Cash",
                        "type":"expense","date":"2024-03-02"}]"#;
        assert!(matches!(import_json(json), Err(BackupError::InvalidRecord { .. })));
    }

    #[test]
    fn test_expense_without_category_rejected_on_import() {
        for category in ["null", "\"\"", "\"  \""] {
            let json = format!(
                r#"[{{"id":"1","amount":"5","category":{category},"paymentMethod":"Cash",
                     "type":"expense","date":"2024-03-02"}}]"#
            );
            assert!(
                matches!(import_json(&json), Err(BackupError::InvalidRecord { .. })),
                "category {category} should be rejected"
            );
        }
    }

    #[test]
    fn test_oversized_amount_rejected_on_import() {
        let json = r#"[{"id":"1","amount":"79228162514264337593543950335","category":"Food",
                        "paymentMethod":"Cash","type":"expense","date":"2024-03-02"}]"#;
        assert!(matches!(import_json(json), Err(BackupError::InvalidRecord { .. })));
    }

    #[test]
    fn test_restore_rekeys_repeats_within_batch() {
        let txns = sample();
        let mut store = MemoryStore::new();
        let batch = vec![txns[0].clone(), txns[0].clone()];
        assert_eq!(restore_into(&mut store, batch, &ClockIds::new()).unwrap(), 2);
        let all = store.list_all().unwrap();
        assert_eq!(all[0], txns[0]);
        assert_ne!(all[1].id, txns[0].id);
    }

    #[test]
    fn test_restore_rekeys_collisions() {
        let txns = sample();
        let mut store = MemoryStore::from_records(txns.clone());
        let restored = restore_into(&mut store, txns.clone(), &ClockIds::new()).unwrap();
        assert_eq!(restored, 2);

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 4);
        let unique: std::collections::HashSet<_> = all.iter().map(|t| t.id.clone()).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_backup_filename() {
        assert_eq!(backup_filename(now()), "expense_backup_20240301_093000.json");
    }
}
