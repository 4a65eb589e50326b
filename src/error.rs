//! Error handling for the chain simulator
//!
//! Invalid candidate blocks are not errors: they are routine outcomes carried
//! by [`crate::validator::RejectReason`]. The variants here cover
//! configuration problems and programming-contract violations.

use thiserror::Error;

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the chain simulator
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Chain invariant violations detected by full-history verification
    #[error("Chain error: {message}")]
    Chain { message: String },

    /// Worker thread errors
    #[error("Worker error: {message}")]
    Worker { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a chain error
    pub fn chain(message: impl Into<String>) -> Self {
        Self::Chain {
            message: message.into(),
        }
    }

    /// Create a worker error
    pub fn worker(message: impl Into<String>) -> Self {
        Self::Worker {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config",
            Error::Chain { .. } => "chain",
            Error::Worker { .. } => "worker",
        }
    }
}
