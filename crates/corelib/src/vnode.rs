//! Virtual node abstractions.
//!
//! Each server is placed on the ring several times. Replica `i` of server
//! `S` is identified by the string `"S-i"`, and its slot is the partitioner's
//! hash of that string. Because the identity is derived, a server's slots can
//! be recomputed at any time from its name alone, which is how removal finds
//! them.
//!
//! More virtual nodes per server give a smoother key distribution at the cost
//! of a larger ring. Lookup stays O(log n) in the total number of positions.

use std::fmt;

use crate::partitioner::Partitioner;
use crate::server::ServerId;
use crate::slot::Slot;

/// A single placement of a server on the hash ring.
///
/// Two virtual nodes may hash to the same slot. The ring keeps only one
/// owner per slot, so a `VirtualNode` describes where a replica *would* sit,
/// not a guarantee that it currently owns that slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualNode {
    /// Slot this replica hashes to.
    pub slot: Slot,
    /// Server the replica belongs to.
    pub server: ServerId,
    /// Replica index in `[0, num_virtual_nodes)`.
    pub replica: usize,
}

impl VirtualNode {
    #[inline]
    pub fn new(slot: Slot, server: ServerId, replica: usize) -> Self {
        Self {
            slot,
            server,
            replica,
        }
    }

    /// Identity string hashed to place replica `replica` of `server`.
    pub fn key(server: &str, replica: usize) -> String {
        format!("{}-{}", server, replica)
    }

    /// Computes the placement of replica `replica` of `server`.
    pub fn from_index<P: Partitioner + ?Sized>(
        partitioner: &P,
        server: &ServerId,
        replica: usize,
    ) -> Self {
        let slot = partitioner.partition(Self::key(server.as_str(), replica).as_bytes());
        Self::new(slot, server.clone(), replica)
    }

    /// All `count` placements of `server`, in replica order.
    pub fn all_for<P: Partitioner + ?Sized>(
        partitioner: &P,
        server: &ServerId,
        count: usize,
    ) -> Vec<Self> {
        (0..count)
            .map(|replica| Self::from_index(partitioner, server, replica))
            .collect()
    }
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VNode(slot={}, server={}, replica={})",
            self.slot, self.server, self.replica
        )
    }
}
