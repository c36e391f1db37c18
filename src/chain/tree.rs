use crate::block::Block;
use crate::chain::state::{Sha256Hash, UtxoSet};
use crate::config::Config;
use crate::error::ChainError;
use crate::mempool::Mempool;
use crate::transaction::{resolve, Transaction};
use log::{debug, info};
use std::collections::HashMap;

/// One accepted block together with its private ledger snapshot.
///
/// Nodes are created only by [`Blockchain::add_block`] (or the constructor,
/// for the genesis root) and never mutated afterwards, except that admitting
/// a child appends to the parent's `children` list. The parent link is a
/// hash, not an owning reference, so dropping a node is a plain map removal.
#[derive(Debug, Clone)]
pub struct ChainNode {
    pub block: Block,
    pub parent: Option<Sha256Hash>,
    pub children: Vec<Sha256Hash>,
    pub height: u64,
    utxos: UtxoSet,
}

impl ChainNode {
    /// An independent copy of this node's ledger snapshot. The live snapshot
    /// is never handed out; mutations must not leak back into the tree.
    pub fn utxo_copy(&self) -> UtxoSet {
        self.utxos.clone()
    }
}

/// The forking chain of accepted blocks with per-branch ledger state.
///
/// Tracks every retained branch, derives each branch's unspent-output set
/// incrementally, keeps the canonical pointer on the first node to reach the
/// maximum height, and prunes the oldest height level once it falls behind
/// the retention window. Memory is bounded by the window regardless of total
/// chain length.
#[derive(Debug)]
pub struct Blockchain {
    nodes: HashMap<Sha256Hash, ChainNode>,
    /// Nodes at the minimum retained height; the pruning boundary.
    frontier: Vec<Sha256Hash>,
    canonical: Sha256Hash,
    max_height: u64,
    retention_window: u64,
    mempool: Mempool,
}

impl Blockchain {
    /// Create a chain from a genesis block with the default configuration.
    /// The genesis block is assumed valid; its ledger consists solely of its
    /// coinbase outputs.
    pub fn new(genesis: Block) -> Result<Self, ChainError> {
        Self::with_config(genesis, Config::default())
    }

    pub fn with_config(genesis: Block, config: Config) -> Result<Self, ChainError> {
        if genesis.prev_hash.is_some() {
            return Err(ChainError::InvalidBlock(
                "Genesis block must not name a parent".to_string(),
            ));
        }

        let mut utxos = UtxoSet::new();
        utxos.apply(&genesis.coinbase);

        let genesis_hash = genesis.hash();
        let root = ChainNode {
            block: genesis,
            parent: None,
            children: Vec::new(),
            height: 1,
            utxos,
        };

        let mut nodes = HashMap::new();
        nodes.insert(genesis_hash, root);

        info!("chain initialized at genesis {}", hex::encode(genesis_hash));

        Ok(Blockchain {
            nodes,
            frontier: vec![genesis_hash],
            canonical: genesis_hash,
            max_height: 1,
            retention_window: config.chain.retention_window,
            mempool: Mempool::with_capacity(config.mempool.max_transactions),
        })
    }

    /// Admit a block on top of a retained parent.
    ///
    /// Either the block is entirely consistent and a new node is committed,
    /// or it is refused and no retained state changes: the ledger work
    /// happens on a clone of the parent's snapshot, and the mempool is only
    /// drained after every check has passed.
    pub fn add_block(&mut self, block: Block) -> Result<(), ChainError> {
        let Some(prev_hash) = block.prev_hash else {
            return Err(ChainError::InvalidBlock(
                "Missing parent hash; only the genesis block may lack one".to_string(),
            ));
        };

        let block_hash = block.hash();
        if self.nodes.contains_key(&block_hash) {
            return Err(ChainError::BlockAlreadyExists);
        }

        // A parent that was pruned (or never existed) makes the block
        // permanently unrejoinable.
        let parent = self.nodes.get(&prev_hash).ok_or(ChainError::OrphanBlock)?;
        let height = parent.height + 1;

        let mut working = parent.utxo_copy();
        let accepted = resolve(&block.transactions, &mut working);
        if accepted.len() != block.transactions.len() {
            debug!(
                "block {} rejected: {} of {} transactions resolved",
                hex::encode(block_hash),
                accepted.len(),
                block.transactions.len()
            );
            return Err(ChainError::InvalidBlock(format!(
                "Only {} of {} transactions resolved",
                accepted.len(),
                block.transactions.len()
            )));
        }

        if !block.coinbase.is_coinbase() {
            return Err(ChainError::InvalidBlock(
                "Coinbase transaction must not have inputs".to_string(),
            ));
        }
        // Minting: coinbase outputs are added unconditionally, each under its
        // own index with its own value.
        working.apply(&block.coinbase);

        // The block is now fully accepted; commit.
        for tx in &block.transactions {
            self.mempool.remove_transaction(&tx.hash());
        }

        let node = ChainNode {
            block,
            parent: Some(prev_hash),
            children: Vec::new(),
            height,
            utxos: working,
        };
        self.nodes.insert(block_hash, node);
        if let Some(parent) = self.nodes.get_mut(&prev_hash) {
            parent.children.push(block_hash);
        }

        // Strict increase only: the first block to reach a height keeps the
        // canonical pointer through ties.
        if height > self.max_height {
            self.max_height = height;
            self.canonical = block_hash;
            info!(
                "canonical head moved to {} at height {}",
                hex::encode(block_hash),
                height
            );
        }

        self.prune();
        Ok(())
    }

    /// Advance the pruning boundary at most one level: every frontier node is
    /// dropped and replaced by its direct children. A block at the frontier
    /// height can still be forked from until its level is a full window plus
    /// one behind the tip.
    fn prune(&mut self) {
        let frontier_height = match self.frontier.first().and_then(|h| self.nodes.get(h)) {
            Some(node) => node.height,
            None => return,
        };
        if self.max_height - frontier_height <= self.retention_window + 1 {
            return;
        }

        let mut next = Vec::new();
        for hash in std::mem::take(&mut self.frontier) {
            if let Some(node) = self.nodes.remove(&hash) {
                next.extend(node.children);
            }
        }
        debug!(
            "pruned frontier at height {}; {} nodes retained",
            frontier_height,
            self.nodes.len()
        );
        self.frontier = next;
    }

    /// The block at the head of the canonical branch. Its height is >= the
    /// height of every other retained node.
    pub fn canonical_block(&self) -> &Block {
        // The canonical node sits at max height and the pruner only drops the
        // minimum-height frontier, so this lookup cannot miss.
        &self.nodes[&self.canonical].block
    }

    pub fn canonical_hash(&self) -> Sha256Hash {
        self.canonical
    }

    pub fn canonical_height(&self) -> u64 {
        self.max_height
    }

    /// A copy of the canonical branch's unspent-output set, for assembling
    /// the next candidate block.
    pub fn canonical_utxo_copy(&self) -> UtxoSet {
        self.nodes[&self.canonical].utxo_copy()
    }

    /// A copy of the ledger snapshot of an arbitrary retained block. Asking
    /// for a block that was never committed (or has been pruned) is a usage
    /// error, reported distinctly from data-validity rejections.
    pub fn utxo_copy_at(&self, block_hash: &Sha256Hash) -> Result<UtxoSet, ChainError> {
        self.nodes
            .get(block_hash)
            .map(ChainNode::utxo_copy)
            .ok_or_else(|| ChainError::UnknownBlock(hex::encode(block_hash)))
    }

    pub fn contains_block(&self, block_hash: &Sha256Hash) -> bool {
        self.nodes.contains_key(block_hash)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insert a transaction into the pending pool. No validation happens at
    /// submission time; candidates are only checked at block admission.
    pub fn add_pending_transaction(&mut self, tx: Transaction) -> Result<(), ChainError> {
        self.mempool.add_transaction(tx)
    }

    pub fn mempool(&self) -> &Mempool {
        &self.mempool
    }
}
