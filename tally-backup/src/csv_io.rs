//! CSV export of the transaction list, and CSV import through the normalizer.
//!
//! Exported files have the header
//! `id,date,type,category,paymentMethod,amount,title,description`.
//! Imports look columns up by header name, so spreadsheets that reorder or
//! drop the optional columns (`id`, `category`, `title`, `description`) still load.

use std::io::{Read, Write};

use csv::StringRecord;
use tally_core::{IdSource, RawTransaction, Transaction, display_label, normalize};

use crate::backup::BackupError;

const HEADER: [&str; 8] = [
    "id",
    "date",
    "type",
    "category",
    "paymentMethod",
    "amount",
    "title",
    "description",
];

/// Write `transactions` as CSV, one row per record.
pub fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<(), BackupError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for t in transactions {
        let amount = t.amount.to_string();
        let date = t.date.format("%Y-%m-%d").to_string();
        wtr.write_record([
            t.id.as_str(),
            date.as_str(),
            t.kind.as_str(),
            t.category.as_deref().unwrap_or(""),
            t.payment_method.as_str(),
            amount.as_str(),
            display_label(t),
            t.description.as_str(),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Read CSV rows, normalizing each one into a fresh [`Transaction`].
///
/// Ids in the file are ignored; every row gets a new id from `ids`. The
/// first invalid row aborts the import so nothing partial is returned.
pub fn read_csv<R: Read>(reader: R, ids: &impl IdSource) -> Result<Vec<Transaction>, BackupError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_header(rdr.headers()?)?;
    let mut txns = Vec::new();

    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let raw = columns.raw(&record);
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let t = normalize(&raw, ids).map_err(|source| BackupError::Row { line, source })?;
        txns.push(t);
    }

    tracing::debug!(count = txns.len(), "read transactions from CSV");
    Ok(txns)
}

struct Columns {
    date: usize,
    kind: usize,
    amount: usize,
    payment_method: usize,
    category: Option<usize>,
    description: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, BackupError> {
        let find = |name: &str| header.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require = |name: &'static str| find(name).ok_or(BackupError::MissingColumn(name));

        Ok(Self {
            date: require("date")?,
            kind: require("type")?,
            amount: require("amount")?,
            payment_method: require("paymentMethod")?,
            category: find("category"),
            description: find("description"),
        })
    }

    fn raw(&self, record: &StringRecord) -> RawTransaction {
        let get = |idx: usize| record.get(idx).unwrap_or("").to_string();
        let get_opt = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::to_string);

        RawTransaction {
            kind: get(self.kind),
            amount_text: get(self.amount),
            category: get_opt(self.category).filter(|c| !c.is_empty()),
            payment_method: get(self.payment_method),
            date: get(self.date),
            description: get_opt(self.description),
        }
    }
}
