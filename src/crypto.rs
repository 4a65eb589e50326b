//! Hash oracle for mining
//!
//! Encodes block headers into a fixed little-endian layout, digests them with
//! Blake2s-256 truncated to 32 bits, and checks the leading-zero-bit
//! proof-of-work rule. All functions here are pure; the rest of the system
//! treats the digest as opaque.

use crate::types::BlockHeader;
use blake2::{Blake2s256, Digest};
use byteorder::{LittleEndian, WriteBytesExt};

/// Encoded header size: height u64, timestamp u64, prev_hash u32, nonce u64,
/// proposer_id i32
pub const HEADER_SIZE: usize = 32;

/// Encode a header into its fixed hashable layout (little-endian)
pub fn encode_header(header: &BlockHeader) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_SIZE);
    bytes.write_u64::<LittleEndian>(header.height).unwrap();
    bytes.write_u64::<LittleEndian>(header.timestamp).unwrap();
    bytes.write_u32::<LittleEndian>(header.prev_hash).unwrap();
    bytes
        .write_u64::<LittleEndian>(header.nonce.value())
        .unwrap();
    bytes.write_i32::<LittleEndian>(header.proposer_id).unwrap();
    bytes
}

/// Digest a header to its 32-bit block hash
///
/// Blake2s-256 over the encoded header, truncated to the first four bytes
/// (little-endian). Deterministic and total.
pub fn header_digest(header: &BlockHeader) -> u32 {
    let mut hasher = Blake2s256::new();
    hasher.update(encode_header(header));
    let digest = hasher.finalize();
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Check whether a digest meets the difficulty target
///
/// True iff the digest has at least `difficulty` leading zero bits.
/// A difficulty of 0 always passes; anything above 32 can never pass, which
/// is a valid (if degenerate) configuration rather than an error.
pub fn meets_difficulty(digest: u32, difficulty: u32) -> bool {
    digest.leading_zeros() >= difficulty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Nonce;
    use proptest::prelude::*;

    fn sample_header() -> BlockHeader {
        BlockHeader {
            height: 1,
            timestamp: 1_700_000_000,
            prev_hash: 0x1234_5678,
            nonce: Nonce::new(20),
            proposer_id: 2,
        }
    }

    #[test]
    fn test_encode_header_layout() {
        let encoded = encode_header(&sample_header());
        assert_eq!(encoded.len(), HEADER_SIZE);
        // height occupies the first 8 bytes, little-endian
        assert_eq!(&encoded[..8], &1u64.to_le_bytes());
        // prev_hash sits after height and timestamp
        assert_eq!(&encoded[16..20], &0x1234_5678u32.to_le_bytes());
    }

    #[test]
    fn test_digest_is_deterministic() {
        let header = sample_header();
        assert_eq!(header_digest(&header), header_digest(&header));
    }

    #[test]
    fn test_digest_depends_on_nonce() {
        let header = sample_header();
        let mut other = header;
        other.nonce.increment();
        assert_ne!(header_digest(&header), header_digest(&other));
    }

    #[test]
    fn test_meets_difficulty_edges() {
        // Zero difficulty accepts everything
        assert!(meets_difficulty(u32::MAX, 0));
        assert!(meets_difficulty(0, 0));

        // Only an all-zero digest has 32 leading zeros
        assert!(meets_difficulty(0, 32));
        assert!(!meets_difficulty(1, 32));

        // Above 32 nothing can pass, not even zero
        assert!(!meets_difficulty(0, 33));
    }

    #[test]
    fn test_meets_difficulty_counts_bits() {
        // 0x0fff_ffff has exactly 4 leading zero bits
        assert!(meets_difficulty(0x0fff_ffff, 4));
        assert!(!meets_difficulty(0x0fff_ffff, 5));
    }

    proptest! {
        #[test]
        fn prop_difficulty_is_monotone(digest: u32, difficulty in 1u32..=33) {
            // Passing at a difficulty implies passing at every easier one
            if meets_difficulty(digest, difficulty) {
                prop_assert!(meets_difficulty(digest, difficulty - 1));
            }
        }

        #[test]
        fn prop_zero_difficulty_always_passes(digest: u32) {
            prop_assert!(meets_difficulty(digest, 0));
        }

        #[test]
        fn prop_encoding_is_fixed_size(
            height: u64,
            timestamp: u64,
            prev_hash: u32,
            nonce: u64,
            proposer_id: i32,
        ) {
            let header = BlockHeader {
                height,
                timestamp,
                prev_hash,
                nonce: Nonce::new(nonce),
                proposer_id,
            };
            prop_assert_eq!(encode_header(&header).len(), HEADER_SIZE);
        }
    }
}
