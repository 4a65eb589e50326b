//! Minichain - Main Application
//!
//! Spawns the miner worker pool and runs the arbiter on the main thread.

use minichain::{
    arbiter::Arbiter,
    chain::genesis,
    config::Config,
    miner::MinerWorker,
    round::RoundCoordinator,
    Error, Result, APP_NAME, APP_VERSION,
};

use clap::Parser;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize tracing; RUST_LOG overrides the CLI level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    config.validate()?;

    if config.print_config {
        println!("{}", serde_json::to_string_pretty(&config).map_err(|e| {
            Error::config(format!("failed to render configuration: {e}"))
        })?);
        return Ok(());
    }

    info!("Starting {} v{}", APP_NAME, APP_VERSION);
    info!(
        workers = config.worker_count(),
        difficulty = config.difficulty,
        blocks = config.blocks,
        "configuration"
    );

    run(&config)
}

/// Seed the chain, spawn the miners, and arbitrate until done
fn run(config: &Config) -> Result<()> {
    let timestamp = chrono::Utc::now().timestamp() as u64;
    let coordinator = Arc::new(RoundCoordinator::new(genesis(timestamp, config.difficulty)));

    let tip = coordinator.tip();
    info!(
        hash = format_args!("{:#010x}", tip.hash),
        timestamp, "created genesis block"
    );

    let mut handles = Vec::new();
    for id in 1..=config.worker_count() as i32 {
        let worker = MinerWorker::new(id, config.difficulty, Arc::clone(&coordinator));
        let handle = thread::Builder::new()
            .name(format!("miner-{id}"))
            .spawn(move || worker.run())
            .map_err(|e| Error::worker(format!("failed to spawn miner {id}: {e}")))?;
        handles.push(handle);
    }

    // The arbiter runs on the main thread; with no block limit this loop
    // never returns.
    let arbiter = Arbiter::new(config.difficulty, Arc::clone(&coordinator), config.blocks);
    let committed = arbiter.run();

    for handle in handles {
        let name = handle.thread().name().unwrap_or("miner").to_string();
        if handle.join().is_err() {
            error!(thread = %name, "miner thread panicked");
            return Err(Error::worker(format!("{name} panicked")));
        }
    }

    let chain = coordinator.chain_snapshot();
    chain.verify(config.difficulty)?;
    info!(
        committed,
        length = chain.len(),
        tip_hash = format_args!("{:#010x}", chain.tip().hash),
        "run complete, chain verified"
    );

    Ok(())
}
