//! Arbiter
//!
//! The single consumer of published candidates. It owns the commit decision:
//! validate against the current tip, append on success or report the
//! rejection, then reopen the round and wake every worker. A rejected round
//! retries the same height with a fresh nonce race.

use crate::round::RoundCoordinator;
use crate::validator::validate;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The arbitration loop
pub struct Arbiter {
    difficulty: u32,
    coordinator: Arc<RoundCoordinator>,
    /// Stop after this many commits; `None` runs forever
    max_blocks: Option<u64>,
}

impl Arbiter {
    /// Create the arbiter
    pub fn new(
        difficulty: u32,
        coordinator: Arc<RoundCoordinator>,
        max_blocks: Option<u64>,
    ) -> Self {
        Self {
            difficulty,
            coordinator,
            max_blocks,
        }
    }

    /// Run until the commit limit is reached (closing the coordinator) or the
    /// coordinator is closed externally. Returns the number of commits.
    pub fn run(self) -> u64 {
        let mut committed = 0u64;

        while let Some(candidate) = self.coordinator.wait_for_candidate() {
            // The round is closed while we hold the candidate, so the tip
            // cannot move between the decision and the append.
            let tip = self.coordinator.tip();

            match validate(&tip, &candidate, self.difficulty) {
                Ok(()) => {
                    self.coordinator.commit(candidate);
                    committed += 1;
                    info!(
                        proposer = candidate.header.proposer_id,
                        height = candidate.header.height,
                        timestamp = candidate.header.timestamp,
                        prev_hash = format_args!("{:#010x}", candidate.header.prev_hash),
                        nonce = %candidate.header.nonce,
                        hash = format_args!("{:#010x}", candidate.hash),
                        difficulty = candidate.difficulty,
                        "committed new block"
                    );
                }
                Err(reason) => {
                    warn!(
                        proposer = candidate.header.proposer_id,
                        %reason,
                        "rejected candidate block"
                    );
                }
            }

            if let Some(limit) = self.max_blocks {
                if committed >= limit {
                    debug!(committed, "block limit reached, shutting down");
                    self.coordinator.close();
                    break;
                }
            }

            self.coordinator.open_next_round();
        }

        committed
    }
}
