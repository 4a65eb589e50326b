//! Miner worker
//!
//! Each worker loops forever through three phases: wait for an open round,
//! snapshot the tip under the lock, then search the nonce space lock-free
//! until it finds a digest meeting the difficulty target. The first worker to
//! publish wins the round; later finishers discard their solution and go back
//! to waiting. A worker still grinding on a stale tip keeps searching across
//! round boundaries and will eventually publish a stale candidate, which the
//! arbiter rejects.

use crate::crypto::{header_digest, meets_difficulty};
use crate::round::RoundCoordinator;
use crate::types::{Block, BlockHeader};
use std::sync::Arc;
use tracing::{debug, info};

/// Nonces tried between shutdown checks in the search loop
const SEARCH_BATCH: u64 = 4096;

/// A single mining worker
pub struct MinerWorker {
    id: i32,
    difficulty: u32,
    coordinator: Arc<RoundCoordinator>,
}

impl MinerWorker {
    /// Create a worker with the given proposer id
    pub fn new(id: i32, difficulty: u32, coordinator: Arc<RoundCoordinator>) -> Self {
        Self {
            id,
            difficulty,
            coordinator,
        }
    }

    /// Run the mining loop until the coordinator shuts down
    pub fn run(self) {
        debug!(miner = self.id, "miner started");

        while let Some(tip) = self.coordinator.wait_for_open_round() {
            let Some(candidate) = self.search(&tip) else {
                break;
            };

            info!(
                miner = self.id,
                height = candidate.header.height,
                nonce = %candidate.header.nonce,
                hash = format_args!("{:#010x}", candidate.hash),
                "mined a candidate block"
            );

            if !self.coordinator.try_publish(candidate) {
                // Lost the race; expected, not an error
                debug!(miner = self.id, "round already closed, discarding candidate");
            }
        }

        debug!(miner = self.id, "miner stopped");
    }

    /// Search for a valid next block extending the given tip
    ///
    /// Builds the candidate header once and iterates the nonce, starting from
    /// the tip's nonce, with the round timestamp held fixed. Runs entirely
    /// outside the lock and is unbounded except for the shutdown flag, which
    /// is polled once per batch to keep the hot path tight.
    fn search(&self, tip: &Block) -> Option<Block> {
        let mut header = BlockHeader {
            height: tip.header.height + 1,
            timestamp: tip.header.timestamp,
            prev_hash: tip.hash,
            nonce: tip.header.nonce,
            proposer_id: self.id,
        };

        loop {
            for _ in 0..SEARCH_BATCH {
                header.nonce.increment();
                let hash = header_digest(&header);
                if meets_difficulty(hash, self.difficulty) {
                    return Some(Block::new(header, hash, self.difficulty));
                }
            }
            if self.coordinator.is_closed() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::genesis;
    use crate::validator::validate;

    const DIFFICULTY: u32 = 4;

    fn worker(id: i32) -> MinerWorker {
        let coordinator = Arc::new(RoundCoordinator::new(genesis(1_700_000_000, DIFFICULTY)));
        MinerWorker::new(id, DIFFICULTY, coordinator)
    }

    #[test]
    fn test_search_finds_valid_candidate() {
        let worker = worker(2);
        let tip = worker.coordinator.tip();

        let candidate = worker.search(&tip).expect("coordinator is open");
        assert_eq!(candidate.header.height, tip.header.height + 1);
        assert_eq!(candidate.header.prev_hash, tip.hash);
        assert_eq!(candidate.header.proposer_id, 2);
        assert!(validate(&tip, &candidate, DIFFICULTY).is_ok());
    }

    #[test]
    fn test_search_keeps_round_timestamp_fixed() {
        let worker = worker(1);
        let tip = worker.coordinator.tip();

        let candidate = worker.search(&tip).expect("coordinator is open");
        // The hashed payload uses the tip's timestamp, never the wall clock
        assert_eq!(candidate.header.timestamp, tip.header.timestamp);
    }

    #[test]
    fn test_search_starts_nonce_after_tip_nonce() {
        let worker = worker(1);
        let tip = worker.coordinator.tip();

        let candidate = worker.search(&tip).expect("coordinator is open");
        assert!(candidate.header.nonce.value() > tip.header.nonce.value());
    }

    #[test]
    fn test_search_bails_out_when_closed() {
        let coordinator = Arc::new(RoundCoordinator::new(genesis(0, 33)));
        // Difficulty 33 is unwinnable; only the shutdown flag ends the search
        let worker = MinerWorker::new(1, 33, Arc::clone(&coordinator));
        let tip = coordinator.tip();

        coordinator.close();
        assert!(worker.search(&tip).is_none());
    }

    #[test]
    fn test_run_publishes_and_exits_on_close() {
        let coordinator = Arc::new(RoundCoordinator::new(genesis(0, DIFFICULTY)));
        let worker = MinerWorker::new(1, DIFFICULTY, Arc::clone(&coordinator));

        let handle = std::thread::spawn(move || worker.run());

        let candidate = coordinator.wait_for_candidate().expect("worker publishes");
        assert_eq!(candidate.header.proposer_id, 1);

        coordinator.close();
        handle.join().unwrap();
    }
}
