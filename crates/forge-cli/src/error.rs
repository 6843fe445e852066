//! Error type for a template run.

use forge_core::MineError;
use thiserror::Error;

/// Anything that aborts a template run.
///
/// Pool-listing problems never show up here; they degrade to an empty pool
/// at the read step. Everything below is fatal and nothing gets written.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed transaction record: {0}")]
    Record(#[from] serde_json::Error),

    #[error("transaction {txid}: record is missing the {field} field")]
    MissingField { txid: String, field: &'static str },

    #[error("transaction {txid}: raw hex is invalid")]
    RawHex { txid: String },

    #[error("transaction {txid}: {source}")]
    TxDecode {
        txid: String,
        #[source]
        source: bitcoin::consensus::encode::Error,
    },

    #[error("invalid {what} {value:?}: {reason}")]
    BadHash {
        what: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error(transparent)]
    Mine(#[from] MineError),
}
