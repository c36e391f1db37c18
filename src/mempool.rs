//! Pending transaction pool
//!
//! An unordered, deduplicated holding area for transactions not yet included
//! in any accepted block. Submitters insert without validation; the chain
//! drains entries when a block incorporating them is admitted.

use crate::chain::Sha256Hash;
use crate::error::ChainError;
use crate::transaction::Transaction;
use log::trace;
use std::collections::HashMap;

pub const DEFAULT_MAX_TRANSACTIONS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct Mempool {
    transactions: HashMap<Sha256Hash, Transaction>,
    capacity: usize,
}

impl Mempool {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_TRANSACTIONS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Mempool {
            transactions: HashMap::new(),
            capacity,
        }
    }

    /// Insert a transaction keyed by its hash. Set semantics: re-adding a
    /// transaction already present is a no-op and never counts against the
    /// capacity bound.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<(), ChainError> {
        let hash = tx.hash();
        if self.transactions.len() >= self.capacity && !self.transactions.contains_key(&hash) {
            return Err(ChainError::MempoolFull);
        }
        trace!("mempool add {}", hex::encode(hash));
        self.transactions.insert(hash, tx);
        Ok(())
    }

    pub fn remove_transaction(&mut self, hash: &Sha256Hash) -> Option<Transaction> {
        self.transactions.remove(hash)
    }

    pub fn contains(&self, hash: &Sha256Hash) -> bool {
        self.transactions.contains_key(hash)
    }

    pub fn get(&self, hash: &Sha256Hash) -> Option<&Transaction> {
        self.transactions.get(hash)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }
}

impl Default for Mempool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::address_from_string;
    use crate::transaction::{TxOutput, Value};

    fn test_tx(nonce: u64) -> Transaction {
        Transaction::coinbase(
            vec![TxOutput::new(Value::from_num(1), address_from_string("t"))],
            nonce,
        )
    }

    #[test]
    fn test_add_and_remove() {
        let mut pool = Mempool::new();
        let tx = test_tx(0);
        let hash = tx.hash();

        pool.add_transaction(tx).unwrap();
        assert!(pool.contains(&hash));
        assert_eq!(pool.len(), 1);

        assert!(pool.remove_transaction(&hash).is_some());
        assert!(pool.is_empty());
        assert!(pool.remove_transaction(&hash).is_none());
    }

    #[test]
    fn test_duplicate_insert_is_deduplicated() {
        let mut pool = Mempool::new();
        pool.add_transaction(test_tx(0)).unwrap();
        pool.add_transaction(test_tx(0)).unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_capacity_bound() {
        let mut pool = Mempool::with_capacity(2);
        pool.add_transaction(test_tx(0)).unwrap();
        pool.add_transaction(test_tx(1)).unwrap();

        let result = pool.add_transaction(test_tx(2));
        assert!(matches!(result, Err(ChainError::MempoolFull)));

        // Re-adding an existing entry is still fine at capacity.
        assert!(pool.add_transaction(test_tx(1)).is_ok());
        assert_eq!(pool.len(), 2);
    }
}
