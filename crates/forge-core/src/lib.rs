//! Block template assembly and proof-of-work mining core.
//!
//! This crate provides pure Rust implementations of:
//! - SHA256 double-hashing and byte-order helpers
//! - Merkle root computation over transaction identifiers
//! - Coinbase transaction construction with a witness commitment output
//! - Transaction selection under a block weight budget
//! - Block header serialization and the nonce search

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod assemble;
pub mod block;
pub mod coinbase;
pub mod hash;
pub mod merkle;
pub mod miner;

pub use assemble::{assemble, BlockAssembly, TransactionRef, DEFAULT_WEIGHT_LIMIT};
pub use block::{BlockHeader, BLOCK_HEADER_SIZE, BLOCK_VERSION, HEADER_BITS};
pub use coinbase::{CoinbaseBuilder, CoinbaseTransaction};
pub use hash::{
    decode_hash256, double_sha256, hash_below_target, hash_to_display_hex, reverse_bytes,
};
pub use merkle::{
    compute_merkle_root, witness_commitment, witness_commitment_script, WITNESS_RESERVED_VALUE,
};
pub use miner::{MineError, MinedBlock, Miner};
