//! SHA-256 partitioner.

use sha2::{Digest, Sha256};

use crate::partitioner::traits::Partitioner;
use crate::slot::Slot;

/// Hashes keys with SHA-256 and reduces the full 256-bit digest, read as a
/// big-endian unsigned integer, modulo `num_slots`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sha256Partitioner {
    num_slots: u64,
}

impl Sha256Partitioner {
    /// `num_slots` must be non-zero; [`RingConfig::validate`](crate::RingConfig::validate)
    /// enforces this before a ring is built.
    pub fn new(num_slots: u64) -> Self {
        debug_assert!(num_slots > 0, "num_slots must be non-zero");
        Self { num_slots }
    }
}

impl Partitioner for Sha256Partitioner {
    fn partition(&self, key: &[u8]) -> Slot {
        let digest = Sha256::digest(key);
        Slot(reduce_be(&digest, self.num_slots))
    }

    fn num_slots(&self) -> u64 {
        self.num_slots
    }

    fn name(&self) -> &'static str {
        "Sha256Partitioner"
    }
}

/// Big-endian bytes modulo `modulus`, one byte at a time.
///
/// The accumulator stays below `modulus`, so `acc << 8 | byte` fits in a u128.
fn reduce_be(bytes: &[u8], modulus: u64) -> u64 {
    let modulus = modulus as u128;
    let acc = bytes
        .iter()
        .fold(0u128, |acc, &b| ((acc << 8) | b as u128) % modulus);
    acc as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        let p = Sha256Partitioner::new(512);
        // sha256("") ends in ...b855; the low 9 bits are 0x055.
        assert_eq!(p.partition(b""), Slot(85));
        assert_eq!(p.partition(b"abc"), Slot(429));
        assert_eq!(p.partition(b"Server1-0"), Slot(426));
        assert_eq!(Sha256Partitioner::new(1000).partition(b"abc"), Slot(965));
    }

    #[test]
    fn test_reduction_uses_full_digest() {
        // A non power-of-two modulus larger than 32 bits depends on every byte.
        let p = Sha256Partitioner::new((1 << 61) - 1);
        assert_eq!(p.partition(b"hello"), Slot(747_427_888_554_602_939));
    }

    #[test]
    fn test_single_slot() {
        let p = Sha256Partitioner::new(1);
        assert_eq!(p.partition(b"anything"), Slot(0));
        assert_eq!(p.partition(b"else"), Slot(0));
    }

    #[test]
    fn test_reduce_be() {
        assert_eq!(reduce_be(&[0x01, 0x00], 1000), 256);
        assert_eq!(reduce_be(&[0xff; 4], 7), (u32::MAX % 7) as u64);
        assert_eq!(reduce_be(&[], 9), 0);
    }

    #[test]
    fn test_deterministic() {
        let p = Sha256Partitioner::new(512);
        assert_eq!(p.partition(b"key"), p.partition(b"key"));
    }
}
