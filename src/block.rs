//! Block identity and whole-block connection against a parent snapshot.

use crate::crypto::hash256;
use crate::error::{LedgerError, Result};
use crate::transaction::{apply_transactions, transaction_id};
use crate::types::*;

/// BlockId: ℬ → ℍ
pub fn block_id(block: &Block) -> Hash {
    hash256(&encode_block(block))
}

/// ConnectBlock: ℬ × 𝒰𝒮 → {valid, invalid} × 𝒰𝒮
///
/// For block b = (prev, coinbase, txs) against parent snapshot us:
/// 1. Apply txs in order to a copy of us
/// 2. If any tx was dropped: return (invalid, us) — block validity
///    requires every listed transaction to be individually and mutually
///    valid, with no partial acceptance
/// 3. Credit the coinbase outputs unconditionally
/// 4. Return (valid, us')
///
/// The parent snapshot is never mutated; a rejected block leaves no trace.
pub fn connect_block(block: &Block, utxo_set: &UtxoSet) -> Result<(ValidationResult, UtxoSet)> {
    let (accepted, mut new_set) = apply_transactions(&block.transactions, utxo_set)?;

    if accepted.len() != block.transactions.len() {
        return Ok((
            ValidationResult::Invalid(format!(
                "Block accepted {} of {} transactions",
                accepted.len(),
                block.transactions.len()
            )),
            utxo_set.clone(),
        ));
    }

    insert_coinbase(&block.coinbase, &mut new_set)?;

    Ok((ValidationResult::Valid, new_set))
}

/// Genesis snapshot: the outputs of the coinbase and of every ordinary
/// transaction, inserted without validation — genesis is trusted by
/// construction.
pub fn genesis_utxo_set(genesis: &Block) -> UtxoSet {
    let mut utxo_set = UtxoSet::new();
    insert_outputs(&genesis.coinbase, &mut utxo_set);
    for tx in &genesis.transactions {
        insert_outputs(tx, &mut utxo_set);
    }
    utxo_set
}

/// Coinbase outputs enter the set unconditionally — value creation is the
/// point. A coinbase carrying inputs is a construction error rather than
/// a validation outcome: the boolean surface only classifies well-formed
/// blocks.
fn insert_coinbase(coinbase: &Transaction, utxo_set: &mut UtxoSet) -> Result<()> {
    if !coinbase.inputs.is_empty() {
        return Err(LedgerError::BlockValidation(
            "Coinbase must not have inputs".to_string(),
        ));
    }
    insert_outputs(coinbase, utxo_set);
    Ok(())
}

fn insert_outputs(tx: &Transaction, utxo_set: &mut UtxoSet) {
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
        utxo_set.insert(outpoint, utxo);
    }
}

/// Block encoding: previous-hash presence tag, coinbase, then the ordinary
/// transactions, each through the full transaction encoding.
fn encode_block(block: &Block) -> ByteString {
    let mut data = Vec::new();

    match &block.prev_block_hash {
        Some(hash) => {
            data.push(1);
            data.extend_from_slice(hash);
        }
        None => data.push(0),
    }

    data.extend_from_slice(&transaction_id(&block.coinbase));
    data.extend_from_slice(&(block.transactions.len() as u32).to_le_bytes());
    for tx in &block.transactions {
        data.extend_from_slice(&transaction_id(tx));
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coinbase(value: Integer, pubkey: &[u8]) -> Transaction {
        Transaction {
            inputs: vec![],
            outputs: vec![TransactionOutput {
                value,
                pubkey: pubkey.to_vec(),
            }],
        }
    }

    fn coinbase_only_block(prev: Option<Hash>, value: Integer) -> Block {
        Block {
            prev_block_hash: prev,
            coinbase: coinbase(value, &[2; 33]),
            transactions: vec![],
        }
    }

    #[test]
    fn test_block_id_stable() {
        let block = coinbase_only_block(None, 50);
        assert_eq!(block_id(&block), block_id(&block));
    }

    #[test]
    fn test_block_id_depends_on_prev_hash() {
        let genesis = coinbase_only_block(None, 50);
        let child = coinbase_only_block(Some([7; 32]), 50);
        assert_ne!(block_id(&genesis), block_id(&child));
    }

    #[test]
    fn test_connect_block_coinbase_only() {
        let block = coinbase_only_block(Some([7; 32]), 50);
        let utxo_set = UtxoSet::new();

        let (result, new_set) = connect_block(&block, &utxo_set).unwrap();

        assert_eq!(result, ValidationResult::Valid);
        assert_eq!(new_set.len(), 1);
        let outpoint = OutPoint {
            hash: transaction_id(&block.coinbase),
            index: 0,
        };
        assert_eq!(new_set[&outpoint].value, 50);
    }

    #[test]
    fn test_connect_block_rejects_unknown_spend() {
        let bad_tx = Transaction {
            inputs: vec![TransactionInput {
                prevout: OutPoint {
                    hash: [9; 32],
                    index: 0,
                },
                signature: vec![],
            }],
            outputs: vec![TransactionOutput {
                value: 1,
                pubkey: vec![2; 33],
            }],
        };
        let block = Block {
            prev_block_hash: Some([7; 32]),
            coinbase: coinbase(50, &[2; 33]),
            transactions: vec![bad_tx],
        };

        let utxo_set = UtxoSet::new();
        let (result, new_set) = connect_block(&block, &utxo_set).unwrap();

        assert!(matches!(result, ValidationResult::Invalid(_)));
        assert!(new_set.is_empty());
    }

    #[test]
    fn test_connect_block_coinbase_with_inputs_is_error() {
        let block = Block {
            prev_block_hash: Some([7; 32]),
            coinbase: Transaction {
                inputs: vec![TransactionInput {
                    prevout: OutPoint {
                        hash: [1; 32],
                        index: 0,
                    },
                    signature: vec![],
                }],
                outputs: vec![TransactionOutput {
                    value: 50,
                    pubkey: vec![2; 33],
                }],
            },
            transactions: vec![],
        };

        let utxo_set = UtxoSet::new();
        assert!(connect_block(&block, &utxo_set).is_err());
    }

    #[test]
    fn test_genesis_utxo_set_includes_all_outputs() {
        let extra = Transaction {
            inputs: vec![],
            outputs: vec![
                TransactionOutput {
                    value: 3,
                    pubkey: vec![3; 33],
                },
                TransactionOutput {
                    value: 4,
                    pubkey: vec![4; 33],
                },
            ],
        };
        let genesis = Block {
            prev_block_hash: None,
            coinbase: coinbase(50, &[2; 33]),
            transactions: vec![extra.clone()],
        };

        let utxo_set = genesis_utxo_set(&genesis);

        assert_eq!(utxo_set.len(), 3);
        assert!(utxo_set.contains_key(&OutPoint {
            hash: transaction_id(&genesis.coinbase),
            index: 0,
        }));
        assert!(utxo_set.contains_key(&OutPoint {
            hash: transaction_id(&extra),
            index: 1,
        }));
    }
}
