//! Configuration for the chain simulator
//!
//! Command line arguments with environment variable overrides, validated
//! before any thread is spawned.

use crate::{Error, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// Complete configuration for the simulator
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(
    name = "minichain",
    version = env!("CARGO_PKG_VERSION"),
    about = "Minimal proof-of-work chain simulator",
    long_about = "Racing miner threads extend a shared chain one block at a time while a single arbiter validates and commits the winning candidate"
)]
pub struct Config {
    /// Number of miner worker threads (0 = one per logical CPU)
    #[arg(short = 'w', long, env = "MINICHAIN_WORKERS", default_value = "4")]
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Proof-of-work difficulty: required leading zero bits of the block hash
    #[arg(
        short = 'd',
        long,
        env = "MINICHAIN_DIFFICULTY",
        default_value = "24",
        value_parser = clap::value_parser!(u32).range(0..=32)
    )]
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,

    /// Stop after committing this many blocks (default: run forever)
    #[arg(short = 'b', long, env = "MINICHAIN_BLOCKS")]
    pub blocks: Option<u64>,

    /// Log level
    #[arg(short = 'l', long, default_value = "info")]
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    /// Print the parsed configuration as JSON and exit
    #[arg(long)]
    #[serde(skip)]
    pub print_config: bool,
}

fn default_workers() -> usize {
    4
}

fn default_difficulty() -> u32 {
    24
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.blocks == Some(0) {
            return Err(Error::config("block limit must be positive"));
        }
        // The clap range guard covers the CLI path; recheck for other
        // construction paths.
        if self.difficulty > 32 {
            return Err(Error::config(format!(
                "difficulty {} exceeds the 32-bit digest width",
                self.difficulty
            )));
        }
        Ok(())
    }

    /// Effective worker count, resolving 0 to the number of logical CPUs
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["minichain"]).unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.difficulty, 24);
        assert_eq!(config.blocks, None);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parses_overrides() {
        let config = Config::try_parse_from([
            "minichain",
            "--workers",
            "8",
            "--difficulty",
            "4",
            "--blocks",
            "10",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(config.workers, 8);
        assert_eq!(config.difficulty, 4);
        assert_eq!(config.blocks, Some(10));
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_rejects_difficulty_above_32() {
        let result = Config::try_parse_from(["minichain", "--difficulty", "33"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_block_limit() {
        let config = Config::try_parse_from(["minichain", "--blocks", "0"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_workers_resolves_to_cpu_count() {
        let config = Config::try_parse_from(["minichain", "--workers", "0"]).unwrap();
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_config_serializes_to_json() {
        let config = Config::try_parse_from(["minichain"]).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"difficulty\":24"));
    }
}
