use crate::crypto::Address;
use crate::transaction::{Transaction, TxOutput, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type Sha256Hash = [u8; 32];

/// Composite key of one unspent output: the transaction that produced it and
/// the output's position within that transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtxoKey {
    pub tx_hash: Sha256Hash,
    pub output_index: u32,
}

impl UtxoKey {
    pub fn new(tx_hash: Sha256Hash, output_index: u32) -> Self {
        UtxoKey {
            tx_hash,
            output_index,
        }
    }
}

/// The unspent-output set of one ledger state.
///
/// Every key present maps to an output that no committed transaction on this
/// branch has consumed. Cloning produces an independent snapshot; forks never
/// observe each other's writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UtxoSet {
    entries: HashMap<UtxoKey, TxOutput>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &UtxoKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &UtxoKey) -> Option<&TxOutput> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: UtxoKey, output: TxOutput) {
        self.entries.insert(key, output);
    }

    pub fn remove(&mut self, key: &UtxoKey) -> Option<TxOutput> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UtxoKey, &TxOutput)> {
        self.entries.iter()
    }

    /// Total value currently locked to `address`.
    pub fn balance_of(&self, address: &Address) -> Value {
        self.entries
            .values()
            .filter(|output| &output.lock == address)
            .map(|output| output.value)
            .sum()
    }

    /// Apply a transaction's effect: consume its inputs, add its outputs
    /// under `(tx hash, output index)`. For a coinbase there are no inputs,
    /// so this is pure minting. The transaction must already be validated;
    /// no checks happen here.
    pub fn apply(&mut self, tx: &Transaction) {
        for input in &tx.inputs {
            self.entries
                .remove(&UtxoKey::new(input.prev_tx_hash, input.output_index));
        }
        let tx_hash = tx.hash();
        for (i, output) in tx.outputs.iter().enumerate() {
            self.entries
                .insert(UtxoKey::new(tx_hash, i as u32), output.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::address_from_string;
    use crate::transaction::TxInput;

    #[test]
    fn test_apply_consumes_inputs_and_adds_outputs() {
        let mut set = UtxoSet::new();
        let owner = address_from_string("owner");

        let funding = Transaction::coinbase(vec![TxOutput::new(Value::from_num(10), owner)], 0);
        set.apply(&funding);
        let funded_key = UtxoKey::new(funding.hash(), 0);
        assert!(set.contains(&funded_key));

        let spend = Transaction::new(
            vec![TxInput::new(funding.hash(), 0)],
            vec![
                TxOutput::new(Value::from_num(4), address_from_string("a")),
                TxOutput::new(Value::from_num(6), address_from_string("b")),
            ],
        );
        set.apply(&spend);

        assert!(!set.contains(&funded_key));
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get(&UtxoKey::new(spend.hash(), 1)).unwrap().value,
            Value::from_num(6)
        );
    }

    #[test]
    fn test_clone_is_an_isolated_snapshot() {
        let mut set = UtxoSet::new();
        let funding =
            Transaction::coinbase(vec![TxOutput::new(Value::from_num(10), address_from_string("owner"))], 0);
        set.apply(&funding);

        let mut copy = set.clone();
        copy.remove(&UtxoKey::new(funding.hash(), 0));

        assert!(set.contains(&UtxoKey::new(funding.hash(), 0)));
        assert!(copy.is_empty());
    }

    #[test]
    fn test_balance_of_sums_per_address() {
        let mut set = UtxoSet::new();
        let owner = address_from_string("owner");
        set.apply(&Transaction::coinbase(
            vec![
                TxOutput::new(Value::from_num(3), owner),
                TxOutput::new(Value::from_num(4), owner),
                TxOutput::new(Value::from_num(5), address_from_string("other")),
            ],
            0,
        ));

        assert_eq!(set.balance_of(&owner), Value::from_num(7));
    }
}
