//! A [`TransactionStore`] persisted as a JSON backup envelope on disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tally_core::{MemoryStore, StoreError, Transaction, TransactionId, TransactionStore};

use crate::backup::{export_json, import_json};

/// Keeps the collection in memory and rewrites the whole file after every change.
///
/// Writes go to a sibling temp file that is then renamed over the original,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; a file that
    /// repeats an id is rejected with [`StoreError::DuplicateId`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let text = fs::read_to_string(&path)?;
            let txns = import_json(&text).map_err(|e| StoreError::Serialize(e.to_string()))?;
            tracing::debug!(path = %path.display(), count = txns.len(), "opened transaction file");
            MemoryStore::try_from_records(txns)?
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow the current records without copying.
    pub fn records(&self) -> &[Transaction] {
        self.records.as_slice()
    }

    fn save(&self, records: &MemoryStore) -> Result<(), StoreError> {
        let json = export_json(records.as_slice(), Utc::now())
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TransactionStore for JsonFileStore {
    fn insert(&mut self, transaction: Transaction) -> Result<(), StoreError> {
        let mut next = self.records.clone();
        next.insert(transaction)?;
        self.save(&next)?;
        self.records = next;
        Ok(())
    }

    fn insert_many(&mut self, transactions: Vec<Transaction>) -> Result<(), StoreError> {
        let mut next = self.records.clone();
        next.insert_many(transactions)?;
        self.save(&next)?;
        self.records = next;
        Ok(())
    }

    fn delete_by_id(&mut self, id: &TransactionId) -> Result<bool, StoreError> {
        let mut next = self.records.clone();
        if !next.delete_by_id(id)? {
            return Ok(false);
        }
        self.save(&next)?;
        self.records = next;
        tracing::info!(%id, "deleted transaction");
        Ok(true)
    }

    fn list_all(&self) -> Result<Vec<Transaction>, StoreError> {
        self.records.list_all()
    }

    fn contains(&self, id: &TransactionId) -> Result<bool, StoreError> {
        self.records.contains(id)
    }
}
