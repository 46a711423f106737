//! The persisted-store interface and an in-memory implementation.

use std::collections::HashSet;

use crate::error::StoreError;
use crate::transaction::{Transaction, TransactionId};

/// An insertion-ordered collection of transactions.
///
/// Records are never updated in place: they are inserted once and removed by id.
pub trait TransactionStore {
    /// Append a record. Fails with [`StoreError::DuplicateId`] if the id is taken.
    fn insert(&mut self, transaction: Transaction) -> Result<(), StoreError>;

    /// Append a batch in order. Stores that persist commit the whole batch
    /// or none of it; this default stops at the first failure.
    fn insert_many(&mut self, transactions: Vec<Transaction>) -> Result<(), StoreError> {
        for t in transactions {
            self.insert(t)?;
        }
        Ok(())
    }

    /// Remove the record with `id`, returning whether one was removed.
    fn delete_by_id(&mut self, id: &TransactionId) -> Result<bool, StoreError>;

    /// Every stored record in insertion order.
    fn list_all(&self) -> Result<Vec<Transaction>, StoreError>;

    fn contains(&self, id: &TransactionId) -> Result<bool, StoreError> {
        Ok(self.list_all()?.iter().any(|t| &t.id == id))
    }
}

/// `Vec`-backed store, used in tests and as the working set of file stores
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    transactions: Vec<Transaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already persisted records, keeping their order.
    pub fn from_records(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Like [`MemoryStore::from_records`], but fails on the first repeated id.
    pub fn try_from_records(transactions: Vec<Transaction>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.insert_many(transactions)?;
        Ok(store)
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl TransactionStore for MemoryStore {
    fn insert(&mut self, transaction: Transaction) -> Result<(), StoreError> {
        if self.transactions.iter().any(|t| t.id == transaction.id) {
            return Err(StoreError::DuplicateId(transaction.id));
        }
        tracing::debug!(id = %transaction.id, kind = %transaction.kind, "inserted transaction");
        self.transactions.push(transaction);
        Ok(())
    }

    fn insert_many(&mut self, transactions: Vec<Transaction>) -> Result<(), StoreError> {
        let mut seen: HashSet<&TransactionId> = self.transactions.iter().map(|t| &t.id).collect();
        for t in &transactions {
            if !seen.insert(&t.id) {
                return Err(StoreError::DuplicateId(t.id.clone()));
            }
        }
        tracing::debug!(count = transactions.len(), "inserted transactions");
        self.transactions.extend(transactions);
        Ok(())
    }

    fn delete_by_id(&mut self, id: &TransactionId) -> Result<bool, StoreError> {
        let before = self.transactions.len();
        self.transactions.retain(|t| &t.id != id);
        let removed = self.transactions.len() != before;
        tracing::debug!(%id, removed, "delete transaction");
        Ok(removed)
    }

    fn list_all(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.transactions.clone())
    }

    fn contains(&self, id: &TransactionId) -> Result<bool, StoreError> {
        Ok(self.transactions.iter().any(|t| &t.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ClockIds;
    use crate::normalize::{RawTransaction, normalize};

    fn sample(ids: &ClockIds) -> Vec<Transaction> {
        vec![
            normalize(&RawTransaction::income("500", "Bank", "2024-03-02"), ids).unwrap(),
            normalize(&RawTransaction::expense("120", "Rent", "Cash", "2024-03-03"), ids).unwrap(),
            normalize(&RawTransaction::expense("30", "Food", "Cash", "2024-03-01"), ids).unwrap(),
        ]
    }

    #[test]
    fn test_insert_preserves_order() {
        let ids = ClockIds::new();
        let txns = sample(&ids);
        let mut store = MemoryStore::new();
        for t in txns.clone() {
            store.insert(t).unwrap();
        }
        assert_eq!(store.list_all().unwrap(), txns);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let ids = ClockIds::new();
        let t = sample(&ids).remove(0);
        let mut store = MemoryStore::new();
        store.insert(t.clone()).unwrap();
        assert!(matches!(store.insert(t), Err(StoreError::DuplicateId(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_by_id() {
        let ids = ClockIds::new();
        let txns = sample(&ids);
        let mut store = MemoryStore::from_records(txns.clone());

        assert!(store.delete_by_id(&txns[1].id).unwrap());
        assert!(!store.delete_by_id(&txns[1].id).unwrap());
        assert!(!store.contains(&txns[1].id).unwrap());

        let remaining: Vec<_> = store.list_all().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![txns[0].id.clone(), txns[2].id.clone()]);
    }

    #[test]
    fn test_delete_unknown_id() {
        let mut store = MemoryStore::new();
        assert!(!store.delete_by_id(&TransactionId::new("missing")).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_many_is_all_or_nothing() {
        let ids = ClockIds::new();
        let txns = sample(&ids);
        let mut store = MemoryStore::from_records(vec![txns[0].clone()]);

        let batch = vec![txns[1].clone(), txns[0].clone()];
        assert!(matches!(store.insert_many(batch), Err(StoreError::DuplicateId(id)) if id == txns[0].id));
        assert_eq!(store.len(), 1);

        store.insert_many(txns[1..].to_vec()).unwrap();
        assert_eq!(store.list_all().unwrap(), txns);
    }

    #[test]
    fn test_try_from_records_rejects_repeats() {
        let ids = ClockIds::new();
        let txns = sample(&ids);
        assert_eq!(MemoryStore::try_from_records(txns.clone()).unwrap().len(), 3);

        let repeated = vec![txns[0].clone(), txns[1].clone(), txns[0].clone()];
        assert!(matches!(
            MemoryStore::try_from_records(repeated),
            Err(StoreError::DuplicateId(_))
        ));
    }
}
