//! # Ledger-Core
//!
//! Minimal ledger core for a UTXO-based cryptocurrency: a transaction
//! validator/applier enforcing consumption and signature rules, and a
//! block-tree manager that tracks competing forks, selects the canonical
//! head, prunes stale branches, and reconciles a pending-transaction pool.
//!
//! ## Architecture
//!
//! - Value-typed state: every fork owns its UTXO snapshot; nothing is
//!   shared mutable
//! - Pure validation: `check_transaction`/`apply_transactions` read a
//!   snapshot and produce a new one, leaving the input untouched
//! - Serialized insertion: `add_block` is commit-or-reject through
//!   `&mut self`
//!
//! ## Design Principles
//!
//! 1. **Boolean rejection**: invalid input is an outcome, never an
//!    exception; rejection leaves no partial state behind
//! 2. **Deterministic head selection**: greatest height, earliest arrival
//!    wins ties
//! 3. **Opaque cryptography**: hashing and signature verification are
//!    consumed as pure functions with no error path beyond `false`
//! 4. **Exact version pinning** for the consensus-critical crypto crates
//!
//! ## Usage
//!
//! ```rust
//! use ledger_core::Ledger;
//! use ledger_core::types::*;
//!
//! let genesis = Block {
//!     prev_block_hash: None,
//!     coinbase: Transaction {
//!         inputs: vec![],
//!         outputs: vec![TransactionOutput {
//!             value: 50,
//!             pubkey: vec![2; 33],
//!         }],
//!     },
//!     transactions: vec![],
//! };
//!
//! let ledger = Ledger::new(genesis);
//! assert_eq!(ledger.head_utxo_set().len(), 1);
//! ```

pub mod block;
pub mod blocktree;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod mempool;
pub mod transaction;
pub mod types;

// Re-export commonly used types
pub use blocktree::{BlockNode, BlockTree};
pub use constants::*;
pub use error::{LedgerError, Result};
pub use mempool::TransactionPool;
pub use types::*;

/// Caller-facing ledger instance: one block tree plus its pending pool.
///
/// # Examples
///
/// ```
/// use ledger_core::Ledger;
/// use ledger_core::types::*;
/// use ledger_core::block::block_id;
///
/// let genesis = Block {
///     prev_block_hash: None,
///     coinbase: Transaction {
///         inputs: vec![],
///         outputs: vec![TransactionOutput {
///             value: 50,
///             pubkey: vec![2; 33],
///         }],
///     },
///     transactions: vec![],
/// };
///
/// let mut ledger = Ledger::new(genesis.clone());
///
/// // Extend the head with a coinbase-only block
/// let block = Block {
///     prev_block_hash: Some(block_id(&genesis)),
///     coinbase: Transaction {
///         inputs: vec![],
///         outputs: vec![TransactionOutput {
///             value: 50,
///             pubkey: vec![3; 33],
///         }],
///     },
///     transactions: vec![],
/// };
/// assert!(ledger.add_block(block));
///
/// // A block referencing an unknown parent is refused
/// let orphan = Block {
///     prev_block_hash: Some([9; 32]),
///     coinbase: Transaction { inputs: vec![], outputs: vec![] },
///     transactions: vec![],
/// };
/// assert!(!ledger.add_block(orphan));
/// ```
pub struct Ledger {
    tree: BlockTree,
}

impl Ledger {
    /// Create a ledger from a trusted genesis block.
    pub fn new(genesis: Block) -> Self {
        Self {
            tree: BlockTree::new(genesis),
        }
    }

    /// Add a block; `true` on acceptance, `false` on any rejection.
    pub fn add_block(&mut self, block: Block) -> bool {
        self.tree.add_block(block)
    }

    /// Add a transaction to the pending pool.
    pub fn add_transaction(&mut self, tx: Transaction) {
        self.tree.add_transaction(tx)
    }

    /// The block at the head of the canonical chain.
    pub fn head_block(&self) -> &Block {
        self.tree.head_block()
    }

    /// The UTXO snapshot after the head block.
    pub fn head_utxo_set(&self) -> &UtxoSet {
        self.tree.head_utxo_set()
    }

    /// The pending-transaction pool.
    pub fn pending_pool(&self) -> &TransactionPool {
        self.tree.pool()
    }

    /// The underlying block tree, for callers that need node-level access.
    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    /// Validate a single transaction against a UTXO snapshot.
    ///
    /// Pure over its arguments; safe to call concurrently against
    /// independent snapshots for speculative validation.
    pub fn validate_transaction(
        &self,
        tx: &Transaction,
        utxo_set: &UtxoSet,
    ) -> Result<ValidationResult> {
        transaction::check_transaction(tx, utxo_set)
    }

    /// Apply a candidate batch to a copy of `utxo_set`, returning the
    /// accepted subset in order and the resulting snapshot.
    pub fn apply_transactions(
        &self,
        candidates: &[Transaction],
        utxo_set: &UtxoSet,
    ) -> Result<(Vec<Transaction>, UtxoSet)> {
        transaction::apply_transactions(candidates, utxo_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::block_id;

    fn genesis_block() -> Block {
        Block {
            prev_block_hash: None,
            coinbase: Transaction {
                inputs: vec![],
                outputs: vec![TransactionOutput {
                    value: 50,
                    pubkey: vec![2; 33],
                }],
            },
            transactions: vec![],
        }
    }

    #[test]
    fn test_ledger_new() {
        let ledger = Ledger::new(genesis_block());
        assert_eq!(ledger.head_block(), &genesis_block());
        assert_eq!(ledger.head_utxo_set().len(), 1);
    }

    #[test]
    fn test_ledger_add_block() {
        let genesis = genesis_block();
        let mut ledger = Ledger::new(genesis.clone());

        let block = Block {
            prev_block_hash: Some(block_id(&genesis)),
            coinbase: Transaction {
                inputs: vec![],
                outputs: vec![TransactionOutput {
                    value: 50,
                    pubkey: vec![3; 33],
                }],
            },
            transactions: vec![],
        };

        assert!(ledger.add_block(block.clone()));
        assert_eq!(ledger.head_block(), &block);
    }

    #[test]
    fn test_ledger_add_transaction() {
        let mut ledger = Ledger::new(genesis_block());
        let pending_before = ledger.pending_pool().len();

        let tx = Transaction {
            inputs: vec![],
            outputs: vec![TransactionOutput {
                value: 1,
                pubkey: vec![4; 33],
            }],
        };
        ledger.add_transaction(tx.clone());

        assert_eq!(ledger.pending_pool().len(), pending_before + 1);
        assert!(ledger
            .pending_pool()
            .contains(&transaction::transaction_id(&tx)));
    }

    #[test]
    fn test_ledger_validate_transaction_delegate() {
        let ledger = Ledger::new(genesis_block());
        let tx = Transaction {
            inputs: vec![],
            outputs: vec![TransactionOutput {
                value: 0,
                pubkey: vec![4; 33],
            }],
        };

        let result = ledger
            .validate_transaction(&tx, ledger.head_utxo_set())
            .unwrap();
        assert_eq!(result, ValidationResult::Valid);
    }
}
