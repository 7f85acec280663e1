//! Core ledger types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Natural number type
pub type Natural = u64;

/// Integer type
pub type Integer = i64;

/// OutPoint: 𝒪 = ℍ × ℕ
///
/// Identifies one still-spendable output by originating transaction and
/// output index. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: Natural,
}

/// Transaction Input: ℐ = 𝒪 × 𝕊
///
/// The signature is DER-encoded ECDSA over the input's signable content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub signature: ByteString,
}

/// Transaction Output: 𝒯 = ℤ × 𝕊
///
/// The owner is a serialized secp256k1 public key; the ledger treats it as
/// opaque bytes and only hands it to the signature verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: Integer,
    pub pubkey: ByteString,
}

/// Transaction: 𝒯𝒳 = ℐ* × 𝒯*
///
/// Immutable after construction; its content hash is its identity and the
/// basis for the outpoints of its own outputs. A coinbase transaction is a
/// transaction with an empty input list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
}

/// Block: ℬ = ℍ? × 𝒯𝒳 × 𝒯𝒳*
///
/// A `None` previous hash marks the genesis block. The coinbase is carried
/// separately from the ordinary transactions and never enters validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub prev_block_hash: Option<Hash>,
    pub coinbase: Transaction,
    pub transactions: Vec<Transaction>,
}

/// UTXO: 𝒰 = ℤ × 𝕊
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub value: Integer,
    pub pubkey: ByteString,
}

/// UTXO Set: 𝒰𝒮 = 𝒪 → 𝒰
///
/// Every key maps to an output not yet consumed by any transaction applied
/// to this set instance. Every fork of the block tree owns its own clone;
/// sets are never shared mutable state.
pub type UtxoSet = HashMap<OutPoint, Utxo>;

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}
