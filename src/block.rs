//! Block structure

use crate::chain::Sha256Hash;
use crate::transaction::Transaction;
use sha2::{Digest, Sha256};

/// A block: one coinbase plus a list of value transfers, linked to its
/// parent by hash. Only the genesis block lacks a parent.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Block {
    pub prev_hash: Option<Sha256Hash>,
    pub timestamp: u64,
    pub coinbase: Transaction,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(prev_hash: Sha256Hash, coinbase: Transaction, transactions: Vec<Transaction>) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis() as u64;
        Block {
            prev_hash: Some(prev_hash),
            timestamp,
            coinbase,
            transactions,
        }
    }

    /// The out-of-band constructed root of a chain.
    pub fn genesis(coinbase: Transaction) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis() as u64;
        Block {
            prev_hash: None,
            timestamp,
            coinbase,
            transactions: Vec::new(),
        }
    }

    pub fn hash(&self) -> Sha256Hash {
        let mut hasher = Sha256::new();
        if let Some(prev) = &self.prev_hash {
            hasher.update(prev);
        }
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.coinbase.hash());
        for tx in &self.transactions {
            hasher.update(tx.hash());
        }
        hasher.finalize().into()
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash())
    }
}
