//! Minichain
//!
//! A minimal proof-of-work blockchain simulator built around one question:
//! how do racing miner threads and a single validating arbiter share a chain
//! safely? A pool of workers snapshots the tip, searches the nonce space
//! outside the lock, and the first to publish wins the round; the arbiter
//! validates the candidate, commits or rejects it, and reopens the round.
//! One mutex, two condition variables, at most one candidate in flight.

pub mod arbiter;
pub mod chain;
pub mod config;
pub mod crypto;
pub mod error;
pub mod miner;
pub mod round;
pub mod types;
pub mod validator;

pub use chain::Chain;
pub use config::Config;
pub use error::{Error, Result};
pub use round::RoundCoordinator;
pub use types::{Block, BlockHeader, Nonce};
pub use validator::RejectReason;

/// Application information
pub const APP_NAME: &str = "minichain";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
