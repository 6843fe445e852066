//! Coinbase transaction construction.
//!
//! The coinbase is the block's first transaction. It spends nothing, pays
//! the subsidy to a fixed placeholder script, and carries the witness
//! commitment in a second, zero-value output.

use alloc::string::String;
use alloc::vec::Vec;

use crate::hash::{double_sha256, reverse_bytes};
use crate::merkle::{witness_commitment_script, WITNESS_RESERVED_VALUE};

/// Transaction version written into the coinbase (4 bytes, little-endian).
pub const COINBASE_TX_VERSION: u32 = 5;

/// Block subsidy paid by the first output, in satoshis.
pub const BLOCK_SUBSIDY: u64 = 5_000_000_000;

/// Script-sig payload carried by the coinbase input (23 bytes). The exact
/// bytes are load-bearing: the coinbase txid, and through it the header
/// merkle root, changes if they change.
pub const COINBASE_SCRIPT_SIG: &[u8] = b"M696e657220526577617264";

/// Placeholder P2PKH script receiving the subsidy.
pub const REWARD_SCRIPT_PUBKEY: [u8; 25] = [
    0x76, 0xa9, 0x14, 0xc9, 0x22, 0x68, 0x65, 0xa8, 0xf3, 0x67, 0x58, 0xf0, 0x8a, 0x64, 0x5c,
    0x69, 0x1b, 0x7b, 0xcc, 0x17, 0x7f, 0x05, 0x33, 0x88, 0xac,
];

/// Preimage of the commitment used when none is supplied.
///
/// The fallback exists for standalone construction only; block assembly
/// always supplies a real commitment.
pub const FALLBACK_COMMITMENT_TAG: &[u8] = b"Commitment";

/// Builder for the block's coinbase transaction.
#[derive(Debug, Clone, Default)]
pub struct CoinbaseBuilder {
    /// Witness commitment embedded in the OP_RETURN output.
    witness_commitment: Option<[u8; 32]>,
}

impl CoinbaseBuilder {
    /// Create a builder with no commitment set.
    pub fn new() -> Self {
        CoinbaseBuilder {
            witness_commitment: None,
        }
    }

    /// Set the witness commitment for the second output.
    pub fn with_witness_commitment(mut self, commitment: [u8; 32]) -> Self {
        self.witness_commitment = Some(commitment);
        self
    }

    /// Serialize the transaction and compute its ids.
    pub fn build(&self) -> CoinbaseTransaction {
        let commitment = self
            .witness_commitment
            .unwrap_or_else(|| double_sha256(FALLBACK_COMMITMENT_TAG));
        let commitment_script = witness_commitment_script(&commitment);

        let mut raw = Vec::with_capacity(200);

        // Version (4 bytes, little-endian)
        raw.extend_from_slice(&COINBASE_TX_VERSION.to_le_bytes());

        // Marker and flag (witness-bearing transaction)
        raw.push(0x00);
        raw.push(0x01);

        // Input count - always 1 for a coinbase
        raw.push(0x01);

        // Input: null previous output
        raw.extend_from_slice(&[0u8; 32]);
        raw.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());

        // Script-sig
        encode_varint(COINBASE_SCRIPT_SIG.len() as u64, &mut raw);
        raw.extend_from_slice(COINBASE_SCRIPT_SIG);

        // Sequence
        raw.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());

        // Output count
        raw.push(0x02);

        // Output 0: block subsidy to the placeholder script
        raw.extend_from_slice(&BLOCK_SUBSIDY.to_le_bytes());
        encode_varint(REWARD_SCRIPT_PUBKEY.len() as u64, &mut raw);
        raw.extend_from_slice(&REWARD_SCRIPT_PUBKEY);

        // Output 1: zero-value witness commitment
        raw.extend_from_slice(&0u64.to_le_bytes());
        encode_varint(commitment_script.len() as u64, &mut raw);
        raw.extend_from_slice(&commitment_script);

        // Witness: a single stack item holding the reserved value
        raw.push(0x01);
        raw.push(0x20);
        raw.extend_from_slice(&WITNESS_RESERVED_VALUE);

        // Locktime
        raw.extend_from_slice(&0u32.to_le_bytes());

        let id = reverse_bytes(&double_sha256(&raw));

        CoinbaseTransaction {
            raw,
            txid: id,
            wtxid: id,
        }
    }
}

/// A constructed coinbase transaction.
///
/// Both ids are the double hash of the full witness serialization,
/// byte-reversed into display order. Convention would strip the witness
/// data for the txid; the two ids are kept equal on purpose, because every
/// downstream artifact hashes this exact serialization.
#[derive(Debug, Clone)]
pub struct CoinbaseTransaction {
    /// Raw serialized bytes, witness included.
    pub raw: Vec<u8>,
    /// Transaction id, display order.
    pub txid: [u8; 32],
    /// Witness transaction id, display order. Equal to `txid`.
    pub wtxid: [u8; 32],
}

impl CoinbaseTransaction {
    /// Raw bytes as lowercase hex.
    pub fn raw_hex(&self) -> String {
        hex::encode(&self.raw)
    }
}

/// Encode a variable-length integer (compact size).
fn encode_varint(value: u64, output: &mut Vec<u8>) {
    if value < 0xfd {
        output.push(value as u8);
    } else if value <= 0xffff {
        output.push(0xfd);
        output.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xffffffff {
        output.push(0xfe);
        output.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        output.push(0xff);
        output.extend_from_slice(&value.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_encode_varint() {
        let mut output = Vec::new();
        encode_varint(100, &mut output);
        assert_eq!(output, vec![100]);

        output.clear();
        encode_varint(0x1234, &mut output);
        assert_eq!(output, vec![0xfd, 0x34, 0x12]);

        output.clear();
        encode_varint(0x12345678, &mut output);
        assert_eq!(output, vec![0xfe, 0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_serialized_layout() {
        let coinbase = CoinbaseBuilder::new()
            .with_witness_commitment([0xab; 32])
            .build();
        let raw = &coinbase.raw;

        assert_eq!(raw.len(), 191);

        // Version 5, little-endian
        assert_eq!(&raw[0..4], &[0x05, 0x00, 0x00, 0x00]);
        // Marker and flag
        assert_eq!(raw[4], 0x00);
        assert_eq!(raw[5], 0x01);
        // Exactly one input: null prevout, max index
        assert_eq!(raw[6], 0x01);
        assert_eq!(&raw[7..39], &[0u8; 32]);
        assert_eq!(&raw[39..43], &[0xff; 4]);
        // Script-sig
        assert_eq!(raw[43] as usize, COINBASE_SCRIPT_SIG.len());
        assert_eq!(&raw[44..67], COINBASE_SCRIPT_SIG);
        // Sequence
        assert_eq!(&raw[67..71], &[0xff; 4]);
        // Exactly two outputs
        assert_eq!(raw[71], 0x02);
        // Subsidy output
        assert_eq!(&raw[72..80], &BLOCK_SUBSIDY.to_le_bytes());
        assert_eq!(raw[80] as usize, REWARD_SCRIPT_PUBKEY.len());
        assert_eq!(&raw[81..106], &REWARD_SCRIPT_PUBKEY);
        // Commitment output: zero value, OP_RETURN || 0x24 || aa21a9ed || commitment
        assert_eq!(&raw[106..114], &[0u8; 8]);
        assert_eq!(raw[114], 38);
        assert_eq!(&raw[115..120], &[0x6a, 0x24, 0xaa, 0x21, 0xa9]);
        assert_eq!(raw[120], 0xed);
        assert_eq!(&raw[121..153], &[0xab; 32]);
        // Witness stack: one 32-byte reserved item
        assert_eq!(raw[153], 0x01);
        assert_eq!(raw[154], 0x20);
        assert_eq!(&raw[155..187], &[0u8; 32]);
        // Locktime
        assert_eq!(&raw[187..191], &[0u8; 4]);
    }

    #[test]
    fn test_txid_equals_wtxid() {
        let coinbase = CoinbaseBuilder::new()
            .with_witness_commitment([0xab; 32])
            .build();
        assert_eq!(coinbase.txid, coinbase.wtxid);
        assert_eq!(
            hex::encode(coinbase.txid),
            "19747616ef2d0702d30cfc6d22efe3848a255e2c337b6b8e4ef52a71037935c9"
        );
    }

    #[test]
    fn test_raw_hex_golden() {
        let coinbase = CoinbaseBuilder::new()
            .with_witness_commitment([0xab; 32])
            .build();
        let expected = "050000000001010000000000000000000000000000000000000000000000000000000000000000ffffffff174d36393665363537323230353236353737363137323634ffffffff0200f2052a010000001976a914c9226865a8f36758f08a645c691b7bcc177f053388ac0000000000000000266a24aa21a9edabababababababababababababababababababababababababababababababab0120000000000000000000000000000000000000000000000000000000000000000000000000";
        assert_eq!(coinbase.raw_hex(), expected);
    }

    #[test]
    fn test_fallback_commitment() {
        // No commitment supplied: the builder commits to
        // double_sha256("Commitment") instead.
        let coinbase = CoinbaseBuilder::new().build();
        let fallback = double_sha256(FALLBACK_COMMITMENT_TAG);
        assert_eq!(&coinbase.raw[121..153], &fallback[..]);
        assert_eq!(
            hex::encode(coinbase.txid),
            "e9d8cbd80d2c4d6d63f2df51588cf10c20c8cdcf92598ea80e119f8e4177238a"
        );
    }
}
