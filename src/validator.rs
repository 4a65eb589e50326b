//! Candidate block validation
//!
//! The pure decision function the arbiter runs before committing a candidate.
//! Safe to call on snapshots without holding the coordination lock; the caller
//! supplies the tip as it stood at one instant.

use crate::crypto::{header_digest, meets_difficulty};
use crate::types::Block;
use thiserror::Error;

/// Why a candidate block was rejected
///
/// Rejections are routine outcomes of the mining race, not errors; each
/// variant carries the values needed for the rejection log event.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Candidate does not occupy exactly the next slot
    #[error("height {got} does not extend tip height {tip}")]
    HeightGap { tip: u64, got: u64 },

    /// Candidate extends something other than the current tip
    #[error("prev_hash {got:#010x} does not match tip hash {tip:#010x}")]
    StalePrevHash { tip: u32, got: u32 },

    /// Claimed hash does not meet the proof-of-work target
    #[error("hash {hash:#010x} misses difficulty {difficulty}")]
    InsufficientWork { hash: u32, difficulty: u32 },

    /// Claimed hash is not the digest of the header
    #[error("claimed hash {claimed:#010x} does not match recomputed {actual:#010x}")]
    ForgedHash { claimed: u32, actual: u32 },
}

/// Decide whether a candidate may extend the given tip
///
/// All four checks must hold: next height, tip linkage, proof-of-work at the
/// global difficulty, and hash integrity (the digest recomputed independently
/// from the header fields). Any failure rejects with no partial credit.
pub fn validate(tip: &Block, candidate: &Block, difficulty: u32) -> Result<(), RejectReason> {
    if candidate.header.height != tip.header.height + 1 {
        return Err(RejectReason::HeightGap {
            tip: tip.header.height,
            got: candidate.header.height,
        });
    }
    if candidate.header.prev_hash != tip.hash {
        return Err(RejectReason::StalePrevHash {
            tip: tip.hash,
            got: candidate.header.prev_hash,
        });
    }
    if !meets_difficulty(candidate.hash, difficulty) {
        return Err(RejectReason::InsufficientWork {
            hash: candidate.hash,
            difficulty,
        });
    }
    let actual = header_digest(&candidate.header);
    if actual != candidate.hash {
        return Err(RejectReason::ForgedHash {
            claimed: candidate.hash,
            actual,
        });
    }
    Ok(())
}
