//! Pending transactions not yet confirmed on the tracked chain.

use crate::transaction::transaction_id;
use crate::types::{Hash, Transaction};
use std::collections::HashMap;

/// Insertion-ordered set of pending transactions, keyed by transaction id.
///
/// Global bookkeeping, independent of any single fork's UTXO set: block
/// acceptance removes whatever the accepted block confirmed, regardless of
/// which branch it extended.
#[derive(Debug, Clone, Default)]
pub struct TransactionPool {
    by_id: HashMap<Hash, Transaction>,
    order: Vec<Hash>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert by id if absent. Returns false on a duplicate.
    pub fn add(&mut self, tx: Transaction) -> bool {
        let tx_id = transaction_id(&tx);
        if self.by_id.contains_key(&tx_id) {
            return false;
        }
        self.by_id.insert(tx_id, tx);
        self.order.push(tx_id);
        true
    }

    pub fn remove(&mut self, tx_id: &Hash) -> Option<Transaction> {
        let removed = self.by_id.remove(tx_id);
        if removed.is_some() {
            self.order.retain(|id| id != tx_id);
        }
        removed
    }

    pub fn contains(&self, tx_id: &Hash) -> bool {
        self.by_id.contains_key(tx_id)
    }

    pub fn get(&self, tx_id: &Hash) -> Option<&Transaction> {
        self.by_id.get(tx_id)
    }

    /// Pending transactions in insertion order, for callers assembling the
    /// next candidate batch.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionOutput;

    fn tx(value: i64) -> Transaction {
        Transaction {
            inputs: vec![],
            outputs: vec![TransactionOutput {
                value,
                pubkey: vec![2; 33],
            }],
        }
    }

    #[test]
    fn test_add_and_contains() {
        let mut pool = TransactionPool::new();
        let t = tx(1);
        let id = transaction_id(&t);

        assert!(pool.add(t));
        assert!(pool.contains(&id));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut pool = TransactionPool::new();
        let t = tx(1);

        assert!(pool.add(t.clone()));
        assert!(!pool.add(t));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut pool = TransactionPool::new();
        let t = tx(1);
        let id = transaction_id(&t);
        pool.add(t.clone());

        assert_eq!(pool.remove(&id), Some(t));
        assert!(pool.is_empty());
        assert_eq!(pool.remove(&id), None);
    }

    #[test]
    fn test_enumeration_follows_insertion_order() {
        let mut pool = TransactionPool::new();
        let first = tx(1);
        let second = tx(2);
        let third = tx(3);
        pool.add(first.clone());
        pool.add(second.clone());
        pool.add(third.clone());
        pool.remove(&transaction_id(&second));

        let remaining: Vec<&Transaction> = pool.transactions().collect();
        assert_eq!(remaining, vec![&first, &third]);
    }
}
