/// Validation logic and batch resolution separated from type definitions
use crate::chain::{UtxoKey, UtxoSet};
use crate::crypto;
use crate::error::ChainError;
use crate::transaction::types::{Transaction, Value};
use log::trace;

impl Transaction {
    /// Validate this transaction against the given unspent-output set.
    ///
    /// All checks are necessary conditions; the first failure rejects the
    /// whole transaction. Holds iff: every referenced output is unspent in
    /// `ledger`, no output is referenced twice, every input's proof unlocks
    /// the output it spends, all output values are non-negative, and the
    /// consumed total covers the produced total (the difference is an
    /// implicit fee).
    pub fn validate(&self, ledger: &UtxoSet) -> Result<(), ChainError> {
        self.validate_size()?;

        let mut input_total = Value::ZERO;
        for (i, input) in self.inputs.iter().enumerate() {
            let key = UtxoKey::new(input.prev_tx_hash, input.output_index);
            let spent = ledger.get(&key).ok_or_else(|| {
                ChainError::InvalidTransaction(format!(
                    "Input {} references unknown output {}:{}",
                    i,
                    hex::encode(input.prev_tx_hash),
                    input.output_index
                ))
            })?;

            for other in &self.inputs[i + 1..] {
                if UtxoKey::new(other.prev_tx_hash, other.output_index) == key {
                    return Err(ChainError::DoubleSpendDetected(format!(
                        "Output {}:{} claimed twice by the same transaction",
                        hex::encode(key.tx_hash),
                        key.output_index
                    )));
                }
            }

            let (signature, public_key) = match (&input.signature, &input.public_key) {
                (Some(sig), Some(pk)) => (sig, pk),
                _ => {
                    return Err(ChainError::InvalidTransaction(format!(
                        "Input {} not signed",
                        i
                    )))
                }
            };

            if !crypto::lock_matches(public_key, &spent.lock) {
                return Err(ChainError::InvalidTransaction(format!(
                    "Input {} public key does not hash to the output lock {}",
                    i,
                    hex::encode(spent.lock)
                )));
            }

            let payload = self.signable_payload(i)?;
            crypto::verify_signature(public_key, &payload, signature)?;

            // Checked: a sum that exceeds the value range is a rejection,
            // not a panic (and must never wrap into a passing comparison).
            input_total = input_total.checked_add(spent.value).ok_or_else(|| {
                ChainError::InvalidTransaction(format!(
                    "Input value sum overflows at input {}",
                    i
                ))
            })?;
        }

        let mut output_total = Value::ZERO;
        for (i, output) in self.outputs.iter().enumerate() {
            if output.value < Value::ZERO {
                return Err(ChainError::InvalidTransaction(format!(
                    "Output {} has negative value {}",
                    i, output.value
                )));
            }
            output_total = output_total.checked_add(output.value).ok_or_else(|| {
                ChainError::InvalidTransaction(format!(
                    "Output value sum overflows at output {}",
                    i
                ))
            })?;
        }

        if output_total > input_total {
            return Err(ChainError::InvalidTransaction(format!(
                "Outputs total {} exceeds inputs total {}",
                output_total, input_total
            )));
        }

        Ok(())
    }
}

/// Resolve an unordered batch of candidate transactions against a working
/// ledger, mutating it in place, and return the accepted subset in
/// acceptance order (pass order, positional order within a pass).
///
/// Repeated passes over the remaining candidates in their original order: a
/// candidate is accepted as soon as it validates against the working ledger,
/// and its effect is applied immediately so later candidates in the same
/// pass already see its outputs. Passes repeat until one makes no progress.
///
/// The ordering bias is contractual: when two candidates conflict over the
/// same output, the one earlier in the original ordering wins and the other
/// is permanently rejected. Do not replace this with a dependency-sorted or
/// otherwise "fairer" policy.
pub fn resolve(candidates: &[Transaction], ledger: &mut UtxoSet) -> Vec<Transaction> {
    let mut remaining: Vec<Option<&Transaction>> = candidates.iter().map(Some).collect();
    let mut accepted = Vec::new();

    loop {
        let mut progressed = false;

        for slot in remaining.iter_mut() {
            let Some(tx) = *slot else { continue };

            match tx.validate(ledger) {
                Ok(()) => {
                    ledger.apply(tx);
                    accepted.push(tx.clone());
                    *slot = None;
                    progressed = true;
                }
                Err(err) => {
                    trace!("candidate {} not yet acceptable: {}", tx.hash_str(), err);
                }
            }
        }

        if !progressed {
            break;
        }
    }

    accepted
}
