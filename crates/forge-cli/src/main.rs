//! Entry point: read the mempool, assemble a template, mine it, write the
//! artifact.

mod error;
mod mempool;
mod output;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info, LevelFilter};

use forge_core::{assemble, decode_hash256, Miner, DEFAULT_WEIGHT_LIMIT};

use crate::error::RunError;

/// Default previous block hash, display form.
const DEFAULT_PREV_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Default difficulty target, display form.
const DEFAULT_TARGET: &str =
    "0000ffff00000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Parser)]
#[command(name = "forge", about = "Assemble and mine a candidate block template")]
struct Opt {
    /// Directory holding mempool.json and per-transaction records.
    #[arg(long, default_value = "mempool")]
    mempool_dir: PathBuf,

    /// File the mined template is written to.
    #[arg(long, default_value = "out.txt")]
    output: PathBuf,

    /// Previous block hash (64 hex chars, display form).
    #[arg(long, default_value = DEFAULT_PREV_HASH)]
    prev_hash: String,

    /// Difficulty target (64 hex chars, display form).
    #[arg(long, default_value = DEFAULT_TARGET)]
    target: String,

    /// Selection budget in weight units.
    #[arg(long, default_value_t = DEFAULT_WEIGHT_LIMIT)]
    weight_limit: u64,

    /// Worker threads for the nonce search.
    #[arg(long, default_value_t = 1)]
    jobs: usize,
}

fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();
    if let Err(e) = run(&opt) {
        error!("{e}");
        process::exit(1);
    }
}

fn run(opt: &Opt) -> Result<(), RunError> {
    let prev_hash = decode_hash256(&opt.prev_hash).map_err(|reason| RunError::BadHash {
        what: "previous block hash",
        value: opt.prev_hash.clone(),
        reason,
    })?;
    let target = decode_hash256(&opt.target).map_err(|reason| RunError::BadHash {
        what: "difficulty target",
        value: opt.target.clone(),
        reason,
    })?;

    let pool = mempool::read_pool(&opt.mempool_dir);
    info!("{} candidate transaction(s) in pool", pool.len());

    let candidates = pool
        .iter()
        .map(|txid| mempool::load_candidate(&opt.mempool_dir, txid));
    let assembly = assemble(candidates, opt.weight_limit)?;
    info!(
        "selected {} transaction(s), {} weight units",
        assembly.txids.len() - 1,
        assembly.total_weight
    );

    let miner = Miner::new();
    let mined = if opt.jobs > 1 {
        miner.mine_parallel(&prev_hash, &assembly.merkle_root, &target, opt.jobs)?
    } else {
        miner.mine(&prev_hash, &assembly.merkle_root, &target)?
    };
    info!(
        "mined block {} (nonce {})",
        mined.hash_hex(),
        mined.header.nonce
    );

    output::write_template(&opt.output, &mined, &assembly)?;
    info!("template written to {}", opt.output.display());

    Ok(())
}
