//! Forking block tree pruned to a bounded recent window.

use crate::block::{block_id, connect_block, genesis_utxo_set};
use crate::constants::CUT_OFF_AGE;
use crate::mempool::TransactionPool;
use crate::transaction::transaction_id;
use crate::types::*;
use std::collections::HashMap;
use std::time::Instant;

/// A node in the block tree.
///
/// The node exclusively owns the UTXO snapshot that results from applying
/// its block to the parent's snapshot. The parent is a key into the node
/// map, never an owning link, so pruning an ancestor cannot dangle.
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub block: Block,
    pub height: Natural,
    pub arrival: Instant,
    pub utxo_set: UtxoSet,
    pub parent: Option<Hash>,
}

/// Block tree: one node per accepted block, a head pointer, and the pool
/// of pending transactions reconciled on every acceptance.
///
/// Insertion is serialized through `&mut self`; head selection and
/// snapshot handoff are read-modify-write over shared tree state and must
/// not interleave.
#[derive(Debug)]
pub struct BlockTree {
    nodes: HashMap<Hash, BlockNode>,
    head: Hash,
    pool: TransactionPool,
}

impl BlockTree {
    /// Create a tree holding just the genesis block at height 1.
    ///
    /// Genesis is trusted by construction: its snapshot is built from the
    /// coinbase and ordinary-transaction outputs without validation, and
    /// the pending pool is seeded with all of its transactions.
    pub fn new(genesis: Block) -> Self {
        let utxo_set = genesis_utxo_set(&genesis);

        let mut pool = TransactionPool::new();
        pool.add(genesis.coinbase.clone());
        for tx in &genesis.transactions {
            pool.add(tx.clone());
        }

        let hash = block_id(&genesis);
        let root = BlockNode {
            block: genesis,
            height: 1,
            arrival: Instant::now(),
            utxo_set,
            parent: None,
        };

        let mut nodes = HashMap::new();
        nodes.insert(hash, root);

        Self {
            nodes,
            head: hash,
            pool,
        }
    }

    /// Add `block` to the tree if it is valid.
    ///
    /// 1. A second genesis (no previous hash) is rejected
    /// 2. A block whose parent is not tracked is rejected — no orphan
    ///    buffering, no retry queue
    /// 3. A block extending a parent more than `CUT_OFF_AGE` behind the
    ///    maximum height is rejected
    /// 4. The block's transactions are connected against the parent's
    ///    snapshot, all-or-nothing
    /// 5. On success the node is committed at `parent.height + 1`, the
    ///    head pointer is updated (greatest height, earliest arrival wins
    ///    ties) and confirmed transactions leave the pending pool
    ///
    /// Commit-or-reject is atomic: a `false` return leaves the tree, every
    /// snapshot, and the pool exactly as they were.
    pub fn add_block(&mut self, block: Block) -> bool {
        // 1. Second genesis
        let prev_hash = match block.prev_block_hash {
            Some(hash) => hash,
            None => {
                log::debug!("rejecting block: missing previous hash");
                return false;
            }
        };

        // 2. Unknown parent
        let parent = match self.nodes.get(&prev_hash) {
            Some(node) => node,
            None => {
                log::debug!("rejecting block: unknown parent");
                return false;
            }
        };
        let parent_height = parent.height;

        // 3. Cutoff window
        let max_height = self.head_node().height;
        if max_height > parent_height + CUT_OFF_AGE {
            log::debug!(
                "rejecting block: parent height {} is beyond the cutoff at max height {}",
                parent_height,
                max_height
            );
            return false;
        }

        // 4. Connect against the parent snapshot
        let (result, utxo_set) = match connect_block(&block, &parent.utxo_set) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::debug!("rejecting block: {}", err);
                return false;
            }
        };
        if let ValidationResult::Invalid(reason) = result {
            log::debug!("rejecting block: {}", reason);
            return false;
        }

        // 5. Commit
        let hash = block_id(&block);
        let confirmed: Vec<Hash> = block.transactions.iter().map(transaction_id).collect();
        let height = parent_height + 1;
        let node = BlockNode {
            block,
            height,
            arrival: Instant::now(),
            utxo_set,
            parent: Some(prev_hash),
        };
        self.nodes.insert(hash, node);

        // First-seen wins ties: the head moves only on strictly greater
        // height, and every equal-height rival arrived later.
        if height > max_height {
            self.head = hash;
        }

        for tx_id in &confirmed {
            self.pool.remove(tx_id);
        }

        self.prune();

        log::debug!("accepted block at height {}", height);
        true
    }

    /// Add a transaction to the pending pool.
    pub fn add_transaction(&mut self, tx: Transaction) {
        self.pool.add(tx);
    }

    /// The block at the head of the canonical chain.
    pub fn head_block(&self) -> &Block {
        &self.head_node().block
    }

    /// The UTXO snapshot after the head block, for assembling the next
    /// block on top of it.
    pub fn head_utxo_set(&self) -> &UtxoSet {
        &self.head_node().utxo_set
    }

    /// Height of the head block (genesis is height 1).
    pub fn head_height(&self) -> Natural {
        self.head_node().height
    }

    /// The pending-transaction pool.
    pub fn pool(&self) -> &TransactionPool {
        &self.pool
    }

    /// Look up a tracked node by block hash. Pruned and rejected blocks
    /// are absent.
    pub fn node(&self, hash: &Hash) -> Option<&BlockNode> {
        self.nodes.get(hash)
    }

    fn head_node(&self) -> &BlockNode {
        // The head always points at a tracked node: it is set at
        // construction and pruning never evicts the maximum height.
        self.nodes
            .get(&self.head)
            .expect("head node is always tracked")
    }

    /// Evict nodes deeper than `CUT_OFF_AGE` below the maximum height.
    /// They can never again be legal parents, so dropping them bounds
    /// memory without invalidating any accepted descendant.
    fn prune(&mut self) {
        let max_height = self.head_node().height;
        if max_height <= CUT_OFF_AGE {
            return;
        }
        let cutoff = max_height - CUT_OFF_AGE;

        let stale: Vec<Hash> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.height < cutoff)
            .map(|(hash, _)| *hash)
            .collect();
        for hash in stale {
            if let Some(node) = self.nodes.remove(&hash) {
                log::trace!("pruned block node at height {}", node.height);
            }
        }
    }
}
