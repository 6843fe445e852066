//! Merkle root computation over transaction identifiers.

use alloc::vec::Vec;

use crate::hash::{double_sha256, reverse_bytes};

/// The witness reserved value carried by the coinbase witness stack and
/// folded into the witness commitment.
pub const WITNESS_RESERVED_VALUE: [u8; 32] = [0u8; 32];

/// Magic prefix of the witness commitment output script.
pub const WITNESS_COMMITMENT_HEADER: [u8; 4] = [0xaa, 0x21, 0xa9, 0xed];

/// Compute the merkle root of a list of transaction ids.
///
/// Ids are given and returned in display order (big-endian). The tree is
/// built over their byte-reversed forms: each level pairs adjacent nodes
/// left to right and double-hashes the 64-byte concatenation; a level with
/// an odd count duplicates its last node first. An empty list has the
/// all-zero root, and a single id is its own root. Permuting the input
/// changes the root.
pub fn compute_merkle_root(ids: &[[u8; 32]]) -> [u8; 32] {
    if ids.is_empty() {
        return [0u8; 32];
    }

    // Work in internal byte order, flip back at the end.
    let mut level: Vec<[u8; 32]> = ids.iter().map(reverse_bytes).collect();

    while level.len() > 1 {
        if level.len() % 2 == 1 {
            let last = level[level.len() - 1];
            level.push(last);
        }

        let mut next = Vec::with_capacity(level.len() / 2);
        for pair in level.chunks_exact(2) {
            let mut combined = [0u8; 64];
            combined[..32].copy_from_slice(&pair[0]);
            combined[32..].copy_from_slice(&pair[1]);
            next.push(double_sha256(&combined));
        }

        level = next;
    }

    reverse_bytes(&level[0])
}

/// Compute the witness commitment from the witness merkle root.
///
/// commitment = double_sha256(witness_root || WITNESS_RESERVED_VALUE)
pub fn witness_commitment(witness_root: &[u8; 32]) -> [u8; 32] {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(witness_root);
    data[32..].copy_from_slice(&WITNESS_RESERVED_VALUE);
    double_sha256(&data)
}

/// Build the scriptPubKey of the witness commitment output.
///
/// Format: OP_RETURN || 0x24 || WITNESS_COMMITMENT_HEADER || commitment
pub fn witness_commitment_script(commitment: &[u8; 32]) -> Vec<u8> {
    let mut script = Vec::with_capacity(38);

    // OP_RETURN
    script.push(0x6a);

    // Push 36 bytes
    script.push(0x24);

    script.extend_from_slice(&WITNESS_COMMITMENT_HEADER);
    script.extend_from_slice(commitment);

    script
}
