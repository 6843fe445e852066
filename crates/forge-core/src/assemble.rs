//! Transaction selection and block template assembly.

use alloc::vec;
use alloc::vec::Vec;

use crate::coinbase::{CoinbaseBuilder, CoinbaseTransaction};
use crate::merkle::{compute_merkle_root, witness_commitment};

/// Default selection budget, in weight units.
///
/// Deliberately independent of the protocol's 4,000,000-unit ceiling on
/// total block weight; this bounds only what selection admits.
pub const DEFAULT_WEIGHT_LIMIT: u64 = 400_000;

/// Witness id standing in for the not-yet-built coinbase at index 0 of the
/// witness-id list.
pub const COINBASE_WITNESS_PLACEHOLDER: [u8; 32] = [0u8; 32];

/// A pool transaction, reduced to what selection needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRef {
    /// Transaction id, display order.
    pub txid: [u8; 32],
    /// Witness transaction id, display order. Equal to `txid` for
    /// non-witness transactions.
    pub wtxid: [u8; 32],
    /// Weight units the transaction occupies in a block.
    pub weight: u64,
}

/// An assembled block template, ready for the nonce search.
#[derive(Debug, Clone)]
pub struct BlockAssembly {
    /// The constructed coinbase.
    pub coinbase: CoinbaseTransaction,
    /// Final transaction id list; the coinbase id is always index 0.
    pub txids: Vec<[u8; 32]>,
    /// Merkle root over the witness ids; input of the commitment.
    pub witness_merkle_root: [u8; 32],
    /// Merkle root over `txids`; this one goes into the block header.
    pub merkle_root: [u8; 32],
    /// Weight admitted by selection (coinbase excluded).
    pub total_weight: u64,
}

/// Select transactions under the weight budget and build the template.
///
/// Candidates are consumed in pool order. Each one's weight joins the
/// running total and its ids join the selection; the candidate that takes
/// the total to or past `weight_limit` is the last one admitted.
/// Candidates resolve lazily: an `Err` item aborts assembly right where it
/// occurs, and items past the cutoff are never pulled at all.
pub fn assemble<E, I>(candidates: I, weight_limit: u64) -> Result<BlockAssembly, E>
where
    I: IntoIterator<Item = Result<TransactionRef, E>>,
{
    let mut wtxids = vec![COINBASE_WITNESS_PLACEHOLDER];
    let mut selected = Vec::new();
    let mut total_weight = 0u64;

    for candidate in candidates {
        let tx = candidate?;
        total_weight += tx.weight;
        selected.push(tx.txid);
        wtxids.push(tx.wtxid);
        if total_weight >= weight_limit {
            break;
        }
    }

    let witness_merkle_root = compute_merkle_root(&wtxids);
    let commitment = witness_commitment(&witness_merkle_root);
    let coinbase = CoinbaseBuilder::new()
        .with_witness_commitment(commitment)
        .build();

    let mut txids = Vec::with_capacity(selected.len() + 1);
    txids.push(coinbase.txid);
    txids.extend_from_slice(&selected);

    let merkle_root = compute_merkle_root(&txids);

    Ok(BlockAssembly {
        coinbase,
        txids,
        witness_merkle_root,
        merkle_root,
        total_weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{decode_hash256, double_sha256, hash_below_target};
    use crate::miner::Miner;

    fn tx(byte: u8, weight: u64) -> TransactionRef {
        TransactionRef {
            txid: [byte; 32],
            wtxid: [byte.wrapping_add(0x80); 32],
            weight,
        }
    }

    fn ok_pool(txs: &[TransactionRef]) -> Vec<Result<TransactionRef, &'static str>> {
        txs.iter().copied().map(Ok).collect()
    }

    #[test]
    fn test_empty_pool_template() {
        let assembly =
            assemble::<&'static str, _>(Vec::new(), DEFAULT_WEIGHT_LIMIT).unwrap();

        // Witness-id list was just the coinbase placeholder, so the witness
        // root is the zero value and the commitment is the double hash of
        // 64 zero bytes.
        assert_eq!(assembly.witness_merkle_root, [0u8; 32]);
        let expected_commitment =
            decode_hash256("e2f61c3f71d1defd3fa999dfa36953755c690689799962b48bebd836974e8cf9")
                .unwrap();
        assert_eq!(&assembly.coinbase.raw[121..153], &expected_commitment[..]);

        // Only the coinbase remains, and it is its own merkle root.
        let expected_txid =
            decode_hash256("3a0e9df88fc252fbfdceca3635fffd27385a25e8e1c2001964eb0f3705ee590b")
                .unwrap();
        assert_eq!(assembly.txids, vec![expected_txid]);
        assert_eq!(assembly.merkle_root, expected_txid);
        assert_eq!(assembly.total_weight, 0);
    }

    #[test]
    fn test_selection_is_inclusive_at_the_cutoff() {
        // 60 + 40 reaches the limit of 100: the crossing transaction is
        // admitted, nothing after it is.
        let pool = ok_pool(&[tx(0x01, 60), tx(0x02, 40), tx(0x03, 10)]);
        let assembly = assemble(pool, 100).unwrap();

        assert_eq!(assembly.total_weight, 100);
        assert_eq!(assembly.txids.len(), 3); // coinbase + two selected
        assert_eq!(assembly.txids[1], [0x01; 32]);
        assert_eq!(assembly.txids[2], [0x02; 32]);
    }

    #[test]
    fn test_candidates_past_cutoff_are_never_resolved() {
        // The third record is broken, but selection stops at the second,
        // so it must never be pulled.
        let pool = vec![Ok(tx(0x01, 60)), Ok(tx(0x02, 40)), Err("unreadable record")];
        let assembly = assemble(pool, 100).unwrap();
        assert_eq!(assembly.txids.len(), 3);
    }

    #[test]
    fn test_record_error_aborts_assembly() {
        let pool = vec![Ok(tx(0x01, 60)), Err("unreadable record"), Ok(tx(0x03, 10))];
        assert_eq!(
            assemble(pool, DEFAULT_WEIGHT_LIMIT).unwrap_err(),
            "unreadable record"
        );
    }

    #[test]
    fn test_roots_cover_wtxids_and_txids_separately() {
        let pool = ok_pool(&[tx(0x01, 10), tx(0x02, 10)]);
        let assembly = assemble(pool, DEFAULT_WEIGHT_LIMIT).unwrap();

        let wtxids = [COINBASE_WITNESS_PLACEHOLDER, [0x81; 32], [0x82; 32]];
        assert_eq!(assembly.witness_merkle_root, compute_merkle_root(&wtxids));

        let txids = [assembly.coinbase.txid, [0x01; 32], [0x02; 32]];
        assert_eq!(assembly.merkle_root, compute_merkle_root(&txids));
    }

    #[test]
    fn test_empty_pool_end_to_end() {
        // Placeholder witness id, zero witness root, zero64 commitment,
        // single-txid header root, then a mined header below the target.
        let assembly =
            assemble::<&'static str, _>(Vec::new(), DEFAULT_WEIGHT_LIMIT).unwrap();
        let target =
            decode_hash256("0000ffff00000000000000000000000000000000000000000000000000000000")
                .unwrap();

        let miner = Miner::with_timestamp(1_700_000_000);
        let mined = miner
            .mine(&[0u8; 32], &assembly.merkle_root, &target)
            .unwrap();

        assert!(hash_below_target(&mined.hash, &target));
        // The header carries the coinbase txid verbatim as its merkle root.
        assert_eq!(mined.header.merkle_root, assembly.coinbase.txid);
        // And the block hash is really the double hash of the header bytes.
        assert_eq!(
            mined.hash,
            crate::hash::reverse_bytes(&double_sha256(&mined.header.serialize()))
        );
    }
}
