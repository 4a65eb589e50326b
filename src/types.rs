//! Core block types
//!
//! Fundamental types shared by miners, the validator, and the arbiter. Headers
//! are plain copyable data with a fixed hashable layout; see [`crate::crypto`]
//! for the encoding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Proof-of-work nonce (8 bytes)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Nonce(pub u64);

impl Nonce {
    /// Create a new nonce
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the nonce value
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Increment the nonce by 1 in place
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Nonce {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Nonce> for u64 {
    fn from(nonce: Nonce) -> Self {
        nonce.0
    }
}

/// The hashable payload of a block
///
/// Every field participates in the digest; the stored block hash does not.
/// Copied by value between threads, no ownership concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Chain slot this block occupies (genesis is 0)
    pub height: u64,
    /// Round timestamp, inherited from the tip when the round opened
    pub timestamp: u64,
    /// Digest of the block this one extends
    pub prev_hash: u32,
    /// Solution nonce found by the proposer
    pub nonce: Nonce,
    /// Id of the miner that assembled this header (0 for genesis)
    pub proposer_id: i32,
}

/// A block: header plus its digest and the difficulty in effect when mined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    /// Digest over the encoded header; recomputed by the validator on commit
    pub hash: u32,
    /// Leading-zero-bit target the proposer mined against
    pub difficulty: u32,
}

impl Block {
    /// Create a block from a header and its digest
    pub fn new(header: BlockHeader, hash: u32, difficulty: u32) -> Self {
        Self {
            header,
            hash,
            difficulty,
        }
    }

    /// Chain slot of this block
    pub fn height(&self) -> u64 {
        self.header.height
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "height={} timestamp={} prev_hash={:#010x} nonce={} proposer={} hash={:#010x} difficulty={}",
            self.header.height,
            self.header.timestamp,
            self.header.prev_hash,
            self.header.nonce,
            self.header.proposer_id,
            self.hash,
            self.difficulty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_operations() {
        let mut nonce = Nonce::new(100);
        assert_eq!(nonce.value(), 100);

        nonce.increment();
        assert_eq!(nonce.value(), 101);
    }

    #[test]
    fn test_nonce_wrapping_increment() {
        let mut nonce = Nonce::new(u64::MAX);
        nonce.increment();
        assert_eq!(nonce.value(), 0);
    }

    #[test]
    fn test_block_display_includes_all_fields() {
        let block = Block::new(
            BlockHeader {
                height: 7,
                timestamp: 1234,
                prev_hash: 0xdead_beef,
                nonce: Nonce::new(42),
                proposer_id: 3,
            },
            0x0000_ffff,
            24,
        );

        let rendered = block.to_string();
        assert!(rendered.contains("height=7"));
        assert!(rendered.contains("prev_hash=0xdeadbeef"));
        assert!(rendered.contains("nonce=42"));
        assert!(rendered.contains("proposer=3"));
        assert!(rendered.contains("difficulty=24"));
    }
}
