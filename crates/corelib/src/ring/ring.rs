//! Hash ring handle.
//!
//! [`HashRing`] owns the slot table behind a `parking_lot::RwLock<Arc<_>>`.
//! Lookups take the read lock. Membership changes hold the write lock for the
//! whole operation, so readers see a server either fully placed or not at all.
//! [`HashRing::snapshot`] hands out the current `Arc` for lock-free lookups;
//! a later write clones the table first if a snapshot still references it.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::config::RingConfig;
use crate::error::{Error, Result};
use crate::partitioner::{Partitioner, Sha256Partitioner};
use crate::ring::table::SlotTable;
use crate::server::ServerId;
use crate::slot::Slot;
use crate::topology::Topology;
use crate::vnode::VirtualNode;

/// Consistent hash ring mapping keys to servers.
///
/// All methods take `&self`; share the ring across threads with
/// `Arc<HashRing>`.
///
/// ```
/// use corelib::HashRing;
///
/// let ring = HashRing::new();
/// ring.add_server("Server1");
/// ring.add_server("Server2");
/// let server = ring.get_server("ClientRequest1").unwrap();
/// assert!(server == "Server1" || server == "Server2");
/// ```
pub struct HashRing<P: Partitioner = Sha256Partitioner> {
    config: RingConfig,
    partitioner: Arc<P>,
    table: RwLock<Arc<SlotTable>>,
}

impl HashRing<Sha256Partitioner> {
    /// Empty ring with 512 slots and 9 virtual nodes per server.
    pub fn new() -> Self {
        let config = RingConfig::default();
        Self::from_parts(config, Sha256Partitioner::new(config.num_slots))
    }

    /// Empty ring using SHA-256 placement with the given configuration.
    pub fn with_config(config: RingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(
            config,
            Sha256Partitioner::new(config.num_slots),
        ))
    }
}

impl Default for HashRing<Sha256Partitioner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> HashRing<P> {
    /// Empty ring placing keys with a custom partitioner.
    ///
    /// The hash space size is taken from the partitioner.
    pub fn with_partitioner(partitioner: P, num_virtual_nodes: usize) -> Result<Self> {
        let config = RingConfig::new(partitioner.num_slots(), num_virtual_nodes);
        config.validate()?;
        Ok(Self::from_parts(config, partitioner))
    }

    fn from_parts(config: RingConfig, partitioner: P) -> Self {
        Self {
            config,
            partitioner: Arc::new(partitioner),
            table: RwLock::new(Arc::new(SlotTable::new())),
        }
    }

    /// Places every virtual node of `server` on the ring.
    ///
    /// A virtual node hashing to an occupied slot takes that slot over; the
    /// previous owner silently loses it.
    pub fn add_server(&self, server: impl Into<ServerId>) {
        let server = server.into();
        let vnodes = self.virtual_nodes(server.as_str());

        let mut collisions = 0usize;
        let positions = {
            let mut guard = self.table.write();
            let table = Arc::make_mut(&mut *guard);
            for vnode in vnodes {
                if let Some(previous) = table.insert(vnode.slot, server.clone()) {
                    if previous != server {
                        collisions += 1;
                        debug!(
                            slot = %vnode.slot,
                            %previous,
                            %server,
                            "virtual node collision, slot reassigned"
                        );
                    }
                }
            }
            table.len()
        };

        metrics::counter!("ring_servers_added_total").increment(1);
        metrics::counter!("ring_slot_collisions_total").increment(collisions as u64);
        metrics::gauge!("ring_positions").set(positions as f64);
        debug!(%server, positions, collisions, "added server to ring");
    }

    /// Removes the virtual nodes of `server` that it still owns.
    ///
    /// Slots taken over by another server are left alone, and removing an
    /// unknown server is a no-op. Returns the number of positions removed.
    pub fn remove_server(&self, server: &str) -> usize {
        let vnodes = self.virtual_nodes(server);

        let (removed, positions) = {
            let mut guard = self.table.write();
            let table = Arc::make_mut(&mut *guard);
            let removed = vnodes
                .iter()
                .filter(|vnode| table.remove_owned(vnode.slot, server))
                .count();
            (removed, table.len())
        };

        if removed > 0 {
            metrics::counter!("ring_servers_removed_total").increment(1);
            metrics::gauge!("ring_positions").set(positions as f64);
        }
        debug!(server, removed, positions, "removed server from ring");
        removed
    }

    /// Returns the server responsible for `key`.
    ///
    /// Fails with [`Error::NoServer`] when the ring is empty.
    pub fn get_server(&self, key: &str) -> Result<ServerId> {
        let slot = self.slot_for(key);
        metrics::counter!("ring_lookups_total").increment(1);

        let table = self.table.read();
        let server = table.lookup(slot).cloned().ok_or(Error::NoServer)?;
        trace!(key, %slot, %server, "lookup");
        Ok(server)
    }

    /// Immutable view of the ring as it is now.
    pub fn snapshot(&self) -> RingSnapshot<P> {
        RingSnapshot {
            config: self.config,
            partitioner: Arc::clone(&self.partitioner),
            table: Arc::clone(&*self.table.read()),
        }
    }

    /// Ownership view of the current ring.
    pub fn topology(&self) -> Topology {
        self.snapshot().topology()
    }

    /// Hash position of `key`.
    pub fn slot_for(&self, key: &str) -> Slot {
        self.partitioner.partition(key.as_bytes())
    }

    /// Placements `server` would occupy, whether or not it owns them now.
    pub fn virtual_nodes(&self, server: &str) -> Vec<VirtualNode> {
        VirtualNode::all_for(
            &*self.partitioner,
            &ServerId::from(server),
            self.config.num_virtual_nodes,
        )
    }

    pub fn config(&self) -> RingConfig {
        self.config
    }

    pub fn num_slots(&self) -> u64 {
        self.config.num_slots
    }

    pub fn num_virtual_nodes(&self) -> usize {
        self.config.num_virtual_nodes
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Number of occupied positions.
    pub fn position_count(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Distinct servers owning at least one position, sorted.
    pub fn servers(&self) -> Vec<ServerId> {
        self.table.read().servers().into_iter().cloned().collect()
    }

    pub fn contains_server(&self, server: &str) -> bool {
        self.table
            .read()
            .iter()
            .any(|(_, owner)| owner.as_str() == server)
    }

    /// `(position, owner)` pairs in ring order.
    pub fn positions(&self) -> Vec<(Slot, ServerId)> {
        self.table
            .read()
            .iter()
            .map(|(slot, owner)| (slot, owner.clone()))
            .collect()
    }
}

impl<P: Partitioner> fmt::Debug for HashRing<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("config", &self.config)
            .field("partitioner", &self.partitioner.name())
            .field("positions", &self.position_count())
            .finish()
    }
}

/// Point-in-time copy of a [`HashRing`].
///
/// Lookups on a snapshot take no lock and never observe later changes.
pub struct RingSnapshot<P: Partitioner = Sha256Partitioner> {
    config: RingConfig,
    partitioner: Arc<P>,
    table: Arc<SlotTable>,
}

impl<P: Partitioner> RingSnapshot<P> {
    /// Same placement rule as [`HashRing::get_server`].
    pub fn get_server(&self, key: &str) -> Result<&ServerId> {
        let slot = self.partitioner.partition(key.as_bytes());
        self.table.lookup(slot).ok_or(Error::NoServer)
    }

    pub fn config(&self) -> RingConfig {
        self.config
    }

    pub fn table(&self) -> &SlotTable {
        &self.table
    }

    pub fn topology(&self) -> Topology {
        Topology::from_table(&self.table, self.config.num_slots)
    }
}

impl<P: Partitioner> Clone for RingSnapshot<P> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            partitioner: Arc::clone(&self.partitioner),
            table: Arc::clone(&self.table),
        }
    }
}

impl<P: Partitioner> fmt::Debug for RingSnapshot<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingSnapshot")
            .field("config", &self.config)
            .field("positions", &self.table.len())
            .finish()
    }
}
