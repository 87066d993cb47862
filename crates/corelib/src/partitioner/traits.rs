//! Core partitioner trait definitions.

use crate::slot::Slot;

/// A partitioner converts keys into slots for placement on the hash ring.
///
/// Partitioners are stateless apart from their modulus and thread-safe,
/// allowing concurrent slot computation without synchronization.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key into a slot in `[0, num_slots)`.
    ///
    /// Must be deterministic: the same bytes always map to the same slot.
    fn partition(&self, key: &[u8]) -> Slot;

    /// Size of the hash space this partitioner reduces into.
    fn num_slots(&self) -> u64;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
