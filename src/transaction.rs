//! Transaction validation and application against a UTXO set snapshot.

use crate::constants::*;
use crate::crypto::{hash256, verify_signature};
use crate::error::{LedgerError, Result};
use crate::types::*;
use std::collections::HashSet;

/// TransactionId: 𝒯𝒳 → ℍ
///
/// Double-SHA256 of the full transaction encoding, signatures included.
/// Stable because transactions are immutable after construction.
pub fn transaction_id(tx: &Transaction) -> Hash {
    hash256(&encode_transaction(tx))
}

/// Signable content for input `index`: the encoding of that input's
/// outpoint followed by the encoding of every output. Signatures are
/// excluded so the content is stable under signing; the external signer
/// reproduces exactly these bytes.
pub fn signable_data(tx: &Transaction, index: usize) -> Result<ByteString> {
    let input = tx.inputs.get(index).ok_or_else(|| {
        LedgerError::TransactionValidation(format!("Input index {} out of range", index))
    })?;

    let mut data = Vec::new();
    encode_outpoint(&mut data, &input.prevout);
    data.extend_from_slice(&(tx.outputs.len() as u32).to_le_bytes());
    for output in &tx.outputs {
        encode_output(&mut data, output);
    }
    Ok(data)
}

/// CheckTransaction: 𝒯𝒳 × 𝒰𝒮 → {valid, invalid}
///
/// A transaction tx = (ins, outs) is valid against UTXO set us iff:
/// 1. |outs| > 0, |ins| ≤ M_max_inputs, |outs| ≤ M_max_outputs
/// 2. ∀o ∈ outs: 0 ≤ o.value ≤ M_max
/// 3. ∀i ∈ ins: i.prevout ∈ us
/// 4. no outpoint is claimed by more than one input of tx
/// 5. ∀i ∈ ins: i.signature verifies under us(i.prevout).pubkey
/// 6. Σᵢ us(i.prevout).value ≥ Σₒ o.value
pub fn check_transaction(tx: &Transaction, utxo_set: &UtxoSet) -> Result<ValidationResult> {
    // 1. Structural limits
    if tx.outputs.is_empty() {
        return Ok(ValidationResult::Invalid("Empty outputs".to_string()));
    }
    if tx.inputs.len() > MAX_INPUTS {
        return Ok(ValidationResult::Invalid(format!(
            "Too many inputs: {}",
            tx.inputs.len()
        )));
    }
    if tx.outputs.len() > MAX_OUTPUTS {
        return Ok(ValidationResult::Invalid(format!(
            "Too many outputs: {}",
            tx.outputs.len()
        )));
    }

    // 2. Output values must be non-negative and bounded
    for (i, output) in tx.outputs.iter().enumerate() {
        if output.value < 0 || output.value > MAX_MONEY {
            return Ok(ValidationResult::Invalid(format!(
                "Invalid output value {} at index {}",
                output.value, i
            )));
        }
    }

    // 3. Every claimed outpoint must be unspent
    for (i, input) in tx.inputs.iter().enumerate() {
        if !utxo_set.contains_key(&input.prevout) {
            return Ok(ValidationResult::Invalid(format!(
                "Input {} not found in UTXO set",
                i
            )));
        }
    }

    // 4. No outpoint claimed twice within the same transaction
    let mut claimed = HashSet::new();
    for (i, input) in tx.inputs.iter().enumerate() {
        if !claimed.insert(&input.prevout) {
            return Ok(ValidationResult::Invalid(format!(
                "Outpoint claimed twice at input {}",
                i
            )));
        }
    }

    // 5. Every input signature must verify under the owner key of the
    //    output it consumes
    for (i, input) in tx.inputs.iter().enumerate() {
        let message = signable_data(tx, i)?;
        let utxo = match utxo_set.get(&input.prevout) {
            Some(utxo) => utxo,
            None => {
                return Ok(ValidationResult::Invalid(format!(
                    "Input {} not found in UTXO set",
                    i
                )))
            }
        };
        if !verify_signature(&utxo.pubkey, &message, &input.signature) {
            return Ok(ValidationResult::Invalid(format!(
                "Invalid signature at input {}",
                i
            )));
        }
    }

    // 6. No value creation; the surplus is an implicit fee
    let mut total_input_value = 0i64;
    for input in &tx.inputs {
        if let Some(utxo) = utxo_set.get(&input.prevout) {
            total_input_value += utxo.value;
        }
    }
    let total_output_value: i64 = tx.outputs.iter().map(|o| o.value).sum();
    if total_input_value < total_output_value {
        return Ok(ValidationResult::Invalid(
            "Insufficient input value".to_string(),
        ));
    }

    Ok(ValidationResult::Valid)
}

/// ApplyTransactions: 𝒯𝒳* × 𝒰𝒮 → 𝒯𝒳* × 𝒰𝒮
///
/// Processes candidates in order against a private copy of `utxo_set`;
/// order matters because later candidates may spend outputs created by
/// earlier accepted ones. Each accepted transaction consumes its claimed
/// outpoints and inserts its own outputs keyed by its id. Candidates that
/// fail validation are silently dropped, never retried. The caller's set
/// is left untouched.
pub fn apply_transactions(
    candidates: &[Transaction],
    utxo_set: &UtxoSet,
) -> Result<(Vec<Transaction>, UtxoSet)> {
    let mut working = utxo_set.clone();
    let mut accepted = Vec::new();

    for (i, tx) in candidates.iter().enumerate() {
        match check_transaction(tx, &working)? {
            ValidationResult::Valid => {}
            ValidationResult::Invalid(reason) => {
                log::debug!("dropping candidate transaction {}: {}", i, reason);
                continue;
            }
        }

        for input in &tx.inputs {
            working.remove(&input.prevout);
        }

        let tx_id = transaction_id(tx);
        for (index, output) in tx.outputs.iter().enumerate() {
            let outpoint = OutPoint {
                hash: tx_id,
                index: index as Natural,
            };
            let utxo = Utxo {
                value: output.value,
                pubkey: output.pubkey.clone(),
            };
            working.insert(outpoint, utxo);
        }

        accepted.push(tx.clone());
    }

    Ok((accepted, working))
}

/// Full transaction encoding: length-prefixed inputs (outpoint plus
/// signature) followed by length-prefixed outputs.
fn encode_transaction(tx: &Transaction) -> ByteString {
    let mut data = Vec::new();

    data.extend_from_slice(&(tx.inputs.len() as u32).to_le_bytes());
    for input in &tx.inputs {
        encode_outpoint(&mut data, &input.prevout);
        data.extend_from_slice(&(input.signature.len() as u32).to_le_bytes());
        data.extend_from_slice(&input.signature);
    }

    data.extend_from_slice(&(tx.outputs.len() as u32).to_le_bytes());
    for output in &tx.outputs {
        encode_output(&mut data, output);
    }

    data
}

fn encode_outpoint(data: &mut ByteString, outpoint: &OutPoint) {
    data.extend_from_slice(&outpoint.hash);
    data.extend_from_slice(&outpoint.index.to_le_bytes());
}

fn encode_output(data: &mut ByteString, output: &TransactionOutput) {
    data.extend_from_slice(&output.value.to_le_bytes());
    data.extend_from_slice(&(output.pubkey.len() as u32).to_le_bytes());
    data.extend_from_slice(&output.pubkey);
}
