//! Storage collaborator interfaces.
//!
//! The engine owns no persisted state; it queries two stores that other
//! parts of the node maintain. Both are content-addressed by height and
//! append-only: once a height is finalized its block and results never
//! change, which is what makes every operation in this crate a pure read.

use std::collections::HashMap;
use trestle_core::results::TxResult;
use trestle_core::types::{Block, Height};

/// Finalized block storage, queried by height.
pub trait BlockStore {
    /// Current chain head height. Must be a consistent snapshot — callers
    /// read it once per request and validate every bound against that one
    /// value.
    fn height(&self) -> Height;

    /// Load the finalized block at `height`, or `None` if the store has
    /// no block there (pruned, or not yet finalized).
    fn load_block(&self, height: Height) -> Option<Block>;
}

/// Finalized execution-result storage, queried by the height that
/// executed the transactions.
pub trait StateStore {
    /// The ordered execution results of the block at `height`, or `None`
    /// if that height has no finalized results.
    fn load_tx_results(&self, height: Height) -> Option<Vec<TxResult>>;
}

/// In-memory [`BlockStore`], used as a test double and for local tooling.
#[derive(Clone, Debug, Default)]
pub struct MemBlockStore {
    head: Height,
    blocks: HashMap<Height, Block>,
}

impl MemBlockStore {
    pub fn new(head: Height) -> Self {
        MemBlockStore {
            head,
            blocks: HashMap::new(),
        }
    }

    pub fn put_block(&mut self, block: Block) {
        self.blocks.insert(block.header.height, block);
    }
}

impl BlockStore for MemBlockStore {
    fn height(&self) -> Height {
        self.head
    }

    fn load_block(&self, height: Height) -> Option<Block> {
        self.blocks.get(&height).cloned()
    }
}

/// In-memory [`StateStore`] counterpart to [`MemBlockStore`].
#[derive(Clone, Debug, Default)]
pub struct MemStateStore {
    results: HashMap<Height, Vec<TxResult>>,
}

impl MemStateStore {
    pub fn new() -> Self {
        MemStateStore::default()
    }

    pub fn put_tx_results(&mut self, height: Height, results: Vec<TxResult>) {
        self.results.insert(height, results);
    }
}

impl StateStore for MemStateStore {
    fn load_tx_results(&self, height: Height) -> Option<Vec<TxResult>> {
        self.results.get(&height).cloned()
    }
}
