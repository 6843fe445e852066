//! Block header layout and serialization.

use crate::hash::double_sha256;

/// Header version written into mined blocks.
pub const BLOCK_VERSION: u32 = 4;

/// Compact difficulty bits written into mined blocks.
pub const HEADER_BITS: u32 = 0x1f00_ffff;

/// Serialized header size in bytes.
pub const BLOCK_HEADER_SIZE: usize = 80;

/// An 80-byte block header.
///
/// `prev_block_hash` is stored in internal byte order (reversed from its
/// display form); `merkle_root` is stored exactly as the tree returns it.
/// Only `nonce` changes during the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Header version.
    pub version: u32,
    /// Hash of the previous block, internal byte order.
    pub prev_block_hash: [u8; 32],
    /// Merkle root over the block's transaction ids.
    pub merkle_root: [u8; 32],
    /// Unix timestamp, seconds.
    pub timestamp: u32,
    /// Difficulty target in compact form.
    pub bits: u32,
    /// Proof-of-work nonce.
    pub nonce: u32,
}

impl BlockHeader {
    /// Create a header with the nonce at zero.
    pub fn new(prev_block_hash: [u8; 32], merkle_root: [u8; 32], timestamp: u32, bits: u32) -> Self {
        BlockHeader {
            version: BLOCK_VERSION,
            prev_block_hash,
            merkle_root,
            timestamp,
            bits,
            nonce: 0,
        }
    }

    /// Serialize the header to its 80-byte wire form.
    pub fn serialize(&self) -> [u8; BLOCK_HEADER_SIZE] {
        let mut header = [0u8; BLOCK_HEADER_SIZE];

        // Version (4 bytes, little-endian)
        header[0..4].copy_from_slice(&self.version.to_le_bytes());

        // Previous block hash (32 bytes, internal byte order)
        header[4..36].copy_from_slice(&self.prev_block_hash);

        // Merkle root (32 bytes)
        header[36..68].copy_from_slice(&self.merkle_root);

        // Timestamp (4 bytes, little-endian)
        header[68..72].copy_from_slice(&self.timestamp.to_le_bytes());

        // Bits (4 bytes, little-endian)
        header[72..76].copy_from_slice(&self.bits.to_le_bytes());

        // Nonce (4 bytes, little-endian)
        header[76..80].copy_from_slice(&self.nonce.to_le_bytes());

        header
    }

    /// Serialize everything except the nonce (76 bytes).
    ///
    /// The search splices nonces into a copy of this prefix instead of
    /// re-serializing the whole header per attempt.
    pub fn serialize_without_nonce(&self) -> [u8; 76] {
        let mut header = [0u8; 76];

        header[0..4].copy_from_slice(&self.version.to_le_bytes());
        header[4..36].copy_from_slice(&self.prev_block_hash);
        header[36..68].copy_from_slice(&self.merkle_root);
        header[68..72].copy_from_slice(&self.timestamp.to_le_bytes());
        header[72..76].copy_from_slice(&self.bits.to_le_bytes());

        header
    }

    /// Compute the header's double hash (internal byte order).
    pub fn hash(&self) -> [u8; 32] {
        double_sha256(&self.serialize())
    }
}
