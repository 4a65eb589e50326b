//! Append-only block chain
//!
//! A growable vector of committed blocks indexed by height, seeded with a
//! genesis block at construction so the tip always exists. The arbiter is the
//! only mutator; everyone else reads snapshots.

use crate::crypto::{header_digest, meets_difficulty};
use crate::types::{Block, BlockHeader, Nonce};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fixed nonce of the directly-constructed genesis block
pub const GENESIS_NONCE: Nonce = Nonce::new(20);

/// Build the genesis block for the given start-of-run timestamp
///
/// Genesis is constructed, not mined: real computed hash, `prev_hash = 0`,
/// fixed nonce, exempt from the difficulty rule.
pub fn genesis(timestamp: u64, difficulty: u32) -> Block {
    let header = BlockHeader {
        height: 0,
        timestamp,
        prev_hash: 0,
        nonce: GENESIS_NONCE,
        proposer_id: 0,
    };
    Block::new(header, header_digest(&header), difficulty)
}

/// An append-only sequence of committed blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create a chain holding only the given genesis block
    pub fn new(genesis: Block) -> Self {
        Self {
            blocks: vec![genesis],
        }
    }

    /// Commit a block as the new tail
    ///
    /// This is the commit step, not the gate: the caller has already run the
    /// candidate through the validator and holds the coordination lock.
    pub fn append(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// The most recently committed block
    pub fn tip(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain is seeded with genesis at construction")
    }

    /// Number of committed blocks, including genesis
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: the chain holds at least genesis
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block at the given height, if committed
    pub fn get(&self, height: u64) -> Option<&Block> {
        self.blocks.get(height as usize)
    }

    /// Iterate over all committed blocks from genesis to tip
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Verify the full history against the chain invariants
    ///
    /// Checks height indexing, adjacent hash linkage, hash integrity for all
    /// blocks, and proof-of-work for all non-genesis blocks.
    pub fn verify(&self, difficulty: u32) -> Result<()> {
        for (i, block) in self.blocks.iter().enumerate() {
            let height = i as u64;
            if block.header.height != height {
                return Err(Error::chain(format!(
                    "block at index {i} has height {}",
                    block.header.height
                )));
            }
            if header_digest(&block.header) != block.hash {
                return Err(Error::chain(format!(
                    "block at height {height} stores hash {:#010x} but encodes to {:#010x}",
                    block.hash,
                    header_digest(&block.header)
                )));
            }
            if i > 0 {
                let parent = &self.blocks[i - 1];
                if block.header.prev_hash != parent.hash {
                    return Err(Error::chain(format!(
                        "block at height {height} links to {:#010x}, parent hash is {:#010x}",
                        block.header.prev_hash, parent.hash
                    )));
                }
                if !meets_difficulty(block.hash, difficulty) {
                    return Err(Error::chain(format!(
                        "block at height {height} hash {:#010x} misses difficulty {difficulty}",
                        block.hash
                    )));
                }
            }
        }
        Ok(())
    }
}
