//! Round coordination between miners and the arbiter
//!
//! One mutex guards the chain, the pending candidate slot, and the round-open
//! flag; two condition variables implement the wake/sleep handshake. Workers
//! sleep while a candidate is under arbitration, the arbiter sleeps while the
//! miners race. Both waits recheck their condition in a loop, so spurious
//! wakeups and the wake-before-wait race are harmless.
//!
//! Exactly one candidate can be in flight: publishing closes the round, and
//! later solutions for the same round are turned away at the door. This is a
//! single-slot handoff, not a queue.

use crate::chain::Chain;
use crate::types::Block;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

/// Lock-protected shared state
#[derive(Debug)]
struct RoundState {
    chain: Chain,
    pending: Option<Block>,
    round_open: bool,
}

/// Shared handle coordinating miner workers and the arbiter
///
/// Constructed once at startup and passed (via `Arc`) to every worker and the
/// arbiter. The nonce search is the only long-running section that runs
/// outside the lock; every other read or write of shared state goes through
/// the methods here, under the lock.
#[derive(Debug)]
pub struct RoundCoordinator {
    state: Mutex<RoundState>,
    /// Workers wait here for the next round to open
    round_opened: Condvar,
    /// The arbiter waits here for a published candidate
    candidate_ready: Condvar,
    shutdown: AtomicBool,
}

impl RoundCoordinator {
    /// Create a coordinator over a chain holding only the genesis block
    ///
    /// The first round is open immediately.
    pub fn new(genesis: Block) -> Self {
        Self {
            state: Mutex::new(RoundState {
                chain: Chain::new(genesis),
                pending: None,
                round_open: true,
            }),
            round_opened: Condvar::new(),
            candidate_ready: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Block until a round is open, then snapshot the tip
    ///
    /// Returns `None` once the coordinator has been closed. The returned tip
    /// is copied out so the caller can search without holding the lock.
    pub fn wait_for_open_round(&self) -> Option<Block> {
        let mut state = self.state.lock();
        while !state.round_open && !self.is_closed() {
            self.round_opened.wait(&mut state);
        }
        if self.is_closed() {
            return None;
        }
        Some(*state.chain.tip())
    }

    /// Publish a mined candidate if the round is still open
    ///
    /// Returns `false` when a faster worker already closed the round (or the
    /// coordinator is shut down); the caller discards its solution silently,
    /// which is the expected outcome of the race. On success the round closes
    /// and the arbiter is signalled.
    pub fn try_publish(&self, candidate: Block) -> bool {
        let mut state = self.state.lock();
        if !state.round_open || self.is_closed() {
            return false;
        }
        state.pending = Some(candidate);
        state.round_open = false;
        self.candidate_ready.notify_one();
        true
    }

    /// Block until a candidate is awaiting arbitration
    ///
    /// Returns a copy; the pending slot is cleared by [`open_next_round`].
    /// Returns `None` once the coordinator has been closed.
    ///
    /// [`open_next_round`]: RoundCoordinator::open_next_round
    pub fn wait_for_candidate(&self) -> Option<Block> {
        let mut state = self.state.lock();
        loop {
            if self.is_closed() {
                return None;
            }
            if let Some(candidate) = state.pending {
                return Some(candidate);
            }
            self.candidate_ready.wait(&mut state);
        }
    }

    /// Snapshot the current tip
    pub fn tip(&self) -> Block {
        *self.state.lock().chain.tip()
    }

    /// Commit a validated candidate as the new tip
    ///
    /// Only the arbiter calls this, after [`crate::validator::validate`]
    /// passed against the same tip; the round is closed for the duration, so
    /// the tip cannot move between the decision and the append.
    pub fn commit(&self, block: Block) {
        self.state.lock().chain.append(block);
    }

    /// Clear the pending slot, reopen the round, and wake all workers
    ///
    /// Called regardless of the arbitration outcome: after a rejection the
    /// same height is simply retried against the unchanged tip.
    pub fn open_next_round(&self) {
        let mut state = self.state.lock();
        state.pending = None;
        state.round_open = true;
        self.round_opened.notify_all();
    }

    /// Number of committed blocks, including genesis
    pub fn chain_len(&self) -> usize {
        self.state.lock().chain.len()
    }

    /// Copy out the full committed chain
    pub fn chain_snapshot(&self) -> Chain {
        self.state.lock().chain.clone()
    }

    /// Shut the coordinator down and wake every sleeper
    pub fn close(&self) {
        let _state = self.state.lock();
        self.shutdown.store(true, Ordering::SeqCst);
        self.round_opened.notify_all();
        self.candidate_ready.notify_all();
    }

    /// Whether [`close`] has been called
    ///
    /// Cheap enough for miners to poll between search batches.
    ///
    /// [`close`]: RoundCoordinator::close
    pub fn is_closed(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}
