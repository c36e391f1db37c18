/// Transaction types for UtxoChain
use crate::chain::Sha256Hash;
use crate::crypto::Address;
use crate::error::ChainError;
use fixed::types::I64F64;
use sha2::{Digest, Sha256};

/// Fixed-point amount type for deterministic value arithmetic.
/// Signed so that a negative output is representable (and rejectable).
pub type Value = I64F64;

/// Maximum transaction size in bytes (100KB) to prevent DoS
pub const MAX_TRANSACTION_SIZE: usize = 100_000;

/// A spendable output: a value locked to an address.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxOutput {
    pub value: Value,
    pub lock: Address,
}

impl TxOutput {
    pub fn new(value: Value, lock: Address) -> Self {
        TxOutput { value, lock }
    }
}

/// A reference to one unspent output, plus the proof that unlocks it.
///
/// The signature and public key are filled in by [`Transaction::sign_input`];
/// both are excluded from the transaction hash and from the signed payload,
/// so the transaction id cannot be changed by re-signing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxInput {
    pub prev_tx_hash: Sha256Hash,
    pub output_index: u32,
    pub signature: Option<Vec<u8>>,
    pub public_key: Option<Vec<u8>>,
}

impl TxInput {
    pub fn new(prev_tx_hash: Sha256Hash, output_index: u32) -> Self {
        TxInput {
            prev_tx_hash,
            output_index,
            signature: None,
            public_key: None,
        }
    }
}

/// A value transfer: consumes previously unspent outputs, produces new ones.
///
/// A transaction with no inputs is a coinbase: it mints its outputs and is
/// only ever applied as part of a block, never resolved against a ledger.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    /// Disambiguates otherwise identical transactions; block producers set
    /// this to the block height on coinbases so rewards at different heights
    /// get distinct ids.
    #[serde(default)]
    pub nonce: u64,
}

impl Transaction {
    pub fn new(inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Self {
        Transaction {
            inputs,
            outputs,
            nonce: 0,
        }
    }

    /// A minting transaction with no inputs.
    pub fn coinbase(outputs: Vec<TxOutput>, nonce: u64) -> Self {
        Transaction {
            inputs: Vec::new(),
            outputs,
            nonce,
        }
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Content-addressed id: hashes outpoints, outputs and nonce.
    /// Unlocking proofs are excluded so the id is stable across signing.
    pub fn hash(&self) -> Sha256Hash {
        let mut hasher = Sha256::new();
        for input in &self.inputs {
            hasher.update(input.prev_tx_hash);
            hasher.update(input.output_index.to_le_bytes());
        }
        for output in &self.outputs {
            hasher.update(output.value.to_le_bytes());
            hasher.update(output.lock);
        }
        hasher.update(self.nonce.to_le_bytes());
        hasher.finalize().into()
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash())
    }

    /// The canonical payload signed for one input: that input's outpoint, the
    /// input index, and every output. No unlocking proof is part of it.
    pub fn signable_payload(&self, input_index: usize) -> Result<Vec<u8>, ChainError> {
        let input = self.inputs.get(input_index).ok_or_else(|| {
            ChainError::InvalidTransaction(format!("No input at index {}", input_index))
        })?;

        let mut payload = Vec::new();
        payload.extend_from_slice(&input.prev_tx_hash);
        payload.extend_from_slice(&input.output_index.to_le_bytes());
        payload.extend_from_slice(&(input_index as u64).to_le_bytes());
        for output in &self.outputs {
            payload.extend_from_slice(&output.value.to_le_bytes());
            payload.extend_from_slice(&output.lock);
        }
        payload.extend_from_slice(&self.nonce.to_le_bytes());
        Ok(payload)
    }

    /// Attach an unlocking proof to one input.
    pub fn sign_input(
        &mut self,
        input_index: usize,
        signature: Vec<u8>,
        public_key: Vec<u8>,
    ) -> Result<(), ChainError> {
        let input = self.inputs.get_mut(input_index).ok_or_else(|| {
            ChainError::InvalidTransaction(format!("No input at index {}", input_index))
        })?;
        input.signature = Some(signature);
        input.public_key = Some(public_key);
        Ok(())
    }

    /// Validate transaction size to prevent DoS attacks
    pub fn validate_size(&self) -> Result<(), ChainError> {
        let serialized = bincode::serialize(self)?;

        if serialized.len() > MAX_TRANSACTION_SIZE {
            return Err(ChainError::InvalidTransaction(format!(
                "Transaction too large: {} bytes (max: {})",
                serialized.len(),
                MAX_TRANSACTION_SIZE
            )));
        }
        Ok(())
    }
}
