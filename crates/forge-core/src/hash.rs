//! SHA256 double-hashing and byte-order helpers.

use alloc::string::String;

use sha2::{Digest, Sha256};

/// Double SHA256: SHA256(SHA256(data)).
///
/// Every block hash, transaction id, and commitment in this crate is a
/// double hash. The function never reverses bytes; display versus internal
/// byte order is the caller's responsibility.
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(&first);
    let mut result = [0u8; 32];
    result.copy_from_slice(&second);
    result
}

/// Reverse the byte order of a 32-byte hash.
///
/// Hashes are displayed in reverse byte order relative to the order they
/// are hashed and serialized in.
#[inline]
pub fn reverse_bytes(bytes: &[u8; 32]) -> [u8; 32] {
    let mut reversed = [0u8; 32];
    for i in 0..32 {
        reversed[i] = bytes[31 - i];
    }
    reversed
}

/// Check whether a hash is strictly below a target.
///
/// Both are treated as 256-bit big-endian numbers. An exactly equal hash
/// does not qualify.
#[inline]
pub fn hash_below_target(hash: &[u8; 32], target: &[u8; 32]) -> bool {
    for i in 0..32 {
        if hash[i] < target[i] {
            return true;
        }
        if hash[i] > target[i] {
            return false;
        }
    }
    false
}

/// Convert an internal-order hash to its display form (reversed hex).
pub fn hash_to_display_hex(hash: &[u8; 32]) -> String {
    hex::encode(reverse_bytes(hash))
}

/// Decode a 64-character hex string into 32 bytes.
///
/// No byte reversal happens here; the result keeps the order of the input
/// text.
pub fn decode_hash256(s: &str) -> Result<[u8; 32], &'static str> {
    let bytes = hex::decode(s).map_err(|_| "invalid hex")?;
    if bytes.len() != 32 {
        return Err("hash must be 32 bytes");
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}
