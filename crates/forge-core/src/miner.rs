//! Proof-of-work nonce search.

use alloc::string::String;

use crate::block::{BlockHeader, HEADER_BITS};
use crate::hash::{double_sha256, hash_below_target, reverse_bytes};

/// Nonce-search failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineError {
    /// Every nonce in the 32-bit space was tried without a hash below the
    /// target.
    SearchExhausted,
}

impl core::fmt::Display for MineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MineError::SearchExhausted => {
                write!(f, "nonce space exhausted without meeting the target")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MineError {}

/// A header that satisfied the target.
#[derive(Debug, Clone)]
pub struct MinedBlock {
    /// The winning header, nonce set.
    pub header: BlockHeader,
    /// Header double hash, display order.
    pub hash: [u8; 32],
}

impl MinedBlock {
    /// The 80 header bytes as 160 hex characters.
    pub fn header_hex(&self) -> String {
        hex::encode(self.header.serialize())
    }

    /// Block hash as display-order hex.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// Fixed header fields for the nonce search.
///
/// Version and bits are constants of the header layout; the timestamp
/// defaults to the current wall clock and can be pinned for reproducible
/// searches.
#[derive(Debug, Clone)]
pub struct Miner {
    bits: u32,
    timestamp: u32,
}

impl Miner {
    /// Miner stamped with the current wall clock.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Miner {
            bits: HEADER_BITS,
            timestamp: current_timestamp(),
        }
    }

    /// Miner with a pinned timestamp.
    pub fn with_timestamp(timestamp: u32) -> Self {
        Miner {
            bits: HEADER_BITS,
            timestamp,
        }
    }

    /// Search nonces 0..=u32::MAX for a header hashing strictly below the
    /// target.
    ///
    /// `prev_hash` and `merkle_root` are taken in display form; the
    /// previous hash is byte-reversed into the header, the merkle root is
    /// placed as given. A header wins when its double hash, byte-reversed
    /// and read as a big-endian integer, is strictly below `target`. Blocks
    /// until a solution is found; a full scan without one is
    /// `SearchExhausted`, not a silent wrap-around.
    pub fn mine(
        &self,
        prev_hash: &[u8; 32],
        merkle_root: &[u8; 32],
        target: &[u8; 32],
    ) -> Result<MinedBlock, MineError> {
        let header = self.header_for(prev_hash, merkle_root);
        let base = header.serialize_without_nonce();

        match scan_nonce_range(&base, target, 0, u32::MAX) {
            Some((nonce, hash)) => Ok(finish(header, nonce, hash)),
            None => Err(MineError::SearchExhausted),
        }
    }

    /// Parallel nonce search over disjoint contiguous ranges.
    ///
    /// Each worker owns its own header copy and scans its slice of the
    /// nonce space; a shared flag stops the others once any worker finds a
    /// valid header. Of the candidates found before everything stops, the
    /// lowest nonce wins. Falls back to the sequential search for a single
    /// worker.
    #[cfg(feature = "std")]
    pub fn mine_parallel(
        &self,
        prev_hash: &[u8; 32],
        merkle_root: &[u8; 32],
        target: &[u8; 32],
        workers: usize,
    ) -> Result<MinedBlock, MineError> {
        use core::sync::atomic::AtomicBool;

        if workers <= 1 {
            return self.mine(prev_hash, merkle_root, target);
        }

        let header = self.header_for(prev_hash, merkle_root);
        let base = header.serialize_without_nonce();
        let stop = AtomicBool::new(false);

        // Contiguous ranges covering the whole space.
        let span = 1u64 << 32;
        let chunk = (span + workers as u64 - 1) / workers as u64;

        let found = std::thread::scope(|scope| {
            let mut handles = alloc::vec::Vec::with_capacity(workers);
            for w in 0..workers as u64 {
                let start = w * chunk;
                if start >= span {
                    break;
                }
                let end = (start + chunk - 1).min(u32::MAX as u64);
                let (base, stop) = (&base, &stop);
                handles.push(scope.spawn(move || {
                    scan_nonce_range_until(base, target, start as u32, end as u32, stop)
                }));
            }

            handles
                .into_iter()
                .filter_map(|handle| handle.join().expect("nonce worker panicked"))
                .min_by_key(|(nonce, _)| *nonce)
        });

        match found {
            Some((nonce, hash)) => Ok(finish(header, nonce, hash)),
            None => Err(MineError::SearchExhausted),
        }
    }

    fn header_for(&self, prev_hash: &[u8; 32], merkle_root: &[u8; 32]) -> BlockHeader {
        BlockHeader::new(
            reverse_bytes(prev_hash),
            *merkle_root,
            self.timestamp,
            self.bits,
        )
    }
}

#[cfg(feature = "std")]
impl Default for Miner {
    fn default() -> Self {
        Self::new()
    }
}

fn finish(mut header: BlockHeader, nonce: u32, hash: [u8; 32]) -> MinedBlock {
    header.nonce = nonce;
    MinedBlock {
        header,
        hash: reverse_bytes(&hash),
    }
}

/// Scan an inclusive nonce range, returning the first nonce whose header
/// hash lands strictly below the target. The returned hash is in internal
/// byte order.
fn scan_nonce_range(
    base: &[u8; 76],
    target: &[u8; 32],
    start: u32,
    end: u32,
) -> Option<(u32, [u8; 32])> {
    let mut header = [0u8; 80];
    header[..76].copy_from_slice(base);

    for nonce in start..=end {
        header[76..80].copy_from_slice(&nonce.to_le_bytes());
        let hash = double_sha256(&header);
        if hash_below_target(&reverse_bytes(&hash), target) {
            return Some((nonce, hash));
        }
    }

    None
}

/// Range scan that also honors a shared stop flag, checked every 4096
/// nonces. Sets the flag itself on success.
#[cfg(feature = "std")]
fn scan_nonce_range_until(
    base: &[u8; 76],
    target: &[u8; 32],
    start: u32,
    end: u32,
    stop: &core::sync::atomic::AtomicBool,
) -> Option<(u32, [u8; 32])> {
    use core::sync::atomic::Ordering;

    let mut header = [0u8; 80];
    header[..76].copy_from_slice(base);

    for nonce in start..=end {
        if nonce & 0x0fff == 0 && stop.load(Ordering::Relaxed) {
            return None;
        }
        header[76..80].copy_from_slice(&nonce.to_le_bytes());
        let hash = double_sha256(&header);
        if hash_below_target(&reverse_bytes(&hash), target) {
            stop.store(true, Ordering::Relaxed);
            return Some((nonce, hash));
        }
    }

    None
}

/// Current Unix time in seconds.
#[cfg(feature = "std")]
fn current_timestamp() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}
