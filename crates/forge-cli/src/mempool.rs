//! Mempool directory reading and transaction record loading.
//!
//! The pool is a directory holding a `mempool.json` listing of txids plus
//! one `<txid>.json` record per transaction. Listing problems degrade to an
//! empty pool; record problems are fatal for the run.

use std::fs::File;
use std::path::Path;

use bitcoin::consensus::encode;
use bitcoin::hashes::Hash;
use bitcoin::Transaction;
use log::{debug, error};
use serde::Deserialize;

use forge_core::{decode_hash256, reverse_bytes, TransactionRef};

use crate::error::RunError;

/// File listing the pool's transaction ids, inside the mempool directory.
pub const POOL_LISTING: &str = "mempool.json";

/// Leading listing entries reserved by the pool source. They name no
/// loadable record and never become candidates.
pub const RESERVED_POOL_SLOTS: usize = 1;

/// On-disk transaction record, reduced to the fields selection needs.
#[derive(Debug, Deserialize)]
struct TxRecord {
    weight: Option<u64>,
    hex: Option<String>,
}

/// Read the pool listing, dropping the reserved slots.
///
/// A missing or malformed listing is logged and yields an empty pool;
/// assembly then proceeds with the coinbase alone.
pub fn read_pool(dir: &Path) -> Vec<String> {
    let listing = dir.join(POOL_LISTING);

    let ids: Vec<String> = match File::open(&listing)
        .map_err(RunError::from)
        .and_then(|file| serde_json::from_reader(file).map_err(RunError::from))
    {
        Ok(ids) => ids,
        Err(e) => {
            error!("error reading {}: {e}", listing.display());
            return Vec::new();
        }
    };

    if !ids.is_empty() {
        debug!(
            "dropping {} reserved slot(s) from a listing of {}",
            RESERVED_POOL_SLOTS.min(ids.len()),
            ids.len()
        );
    }
    ids.into_iter().skip(RESERVED_POOL_SLOTS).collect()
}

/// Resolve one listing entry to its selection metadata.
///
/// Everything here is fatal: selection must not run over a pool whose
/// records cannot be trusted. The wtxid comes from decoding the record's
/// raw bytes; the txid is the listing entry itself.
pub fn load_candidate(dir: &Path, txid: &str) -> Result<TransactionRef, RunError> {
    let path = dir.join(format!("{txid}.json"));
    let record: TxRecord = serde_json::from_reader(File::open(path)?)?;

    let weight = record.weight.ok_or_else(|| RunError::MissingField {
        txid: txid.to_owned(),
        field: "weight",
    })?;
    let raw_hex = record.hex.ok_or_else(|| RunError::MissingField {
        txid: txid.to_owned(),
        field: "hex",
    })?;

    let raw = hex::decode(&raw_hex).map_err(|_| RunError::RawHex {
        txid: txid.to_owned(),
    })?;
    let tx: Transaction = encode::deserialize(&raw).map_err(|source| RunError::TxDecode {
        txid: txid.to_owned(),
        source,
    })?;
    let wtxid = reverse_bytes(&tx.compute_wtxid().to_byte_array());

    let txid = decode_hash256(txid).map_err(|reason| RunError::BadHash {
        what: "pool txid",
        value: txid.to_owned(),
        reason,
    })?;

    Ok(TransactionRef {
        txid,
        wtxid,
        weight,
    })
}
