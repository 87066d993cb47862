//! Ring topology views.
//!
//! A [`Topology`] splits the circle into arcs, one per occupied position.
//! The arc ending at position `p` covers the slots `(previous, p]`, which are
//! exactly the slots a lookup resolves to `p`.

use std::collections::BTreeMap;

use crate::ring::table::SlotTable;
use crate::server::ServerId;
use crate::slot::Slot;

/// Slots `(start, end]` owned by one server, walking clockwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRange {
    /// Previous occupied position (exclusive).
    pub start: Slot,
    /// Occupied position closing the arc (inclusive).
    pub end: Slot,
    pub owner: ServerId,
}

impl SlotRange {
    /// Number of slots in the arc. A lone position covers the whole ring.
    pub fn len(&self, num_slots: u64) -> u64 {
        if self.start == self.end {
            num_slots
        } else {
            self.start.distance_to(self.end, num_slots)
        }
    }
}

/// A server's portion of the hash space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotShare {
    pub slots: u64,
    pub fraction: f64,
}

/// Ownership of the hash space at one point in time.
#[derive(Debug, Clone)]
pub struct Topology {
    num_slots: u64,
    arcs: Vec<SlotRange>,
}

impl Topology {
    pub fn from_table(table: &SlotTable, num_slots: u64) -> Self {
        let positions = table.positions();
        let n = positions.len();
        let arcs = table
            .iter()
            .enumerate()
            .map(|(i, (end, owner))| SlotRange {
                start: positions[(i + n - 1) % n],
                end,
                owner: owner.clone(),
            })
            .collect();
        Self { num_slots, arcs }
    }

    pub fn num_slots(&self) -> u64 {
        self.num_slots
    }

    /// Arcs in ring order; together they cover every slot exactly once.
    pub fn arcs(&self) -> &[SlotRange] {
        &self.arcs
    }

    /// Server a lookup hashing to `slot` resolves to.
    pub fn owner_of(&self, slot: Slot) -> Option<&ServerId> {
        let first = self.arcs.first()?;
        let idx = self.arcs.partition_point(|arc| arc.end < slot);
        Some(&self.arcs.get(idx).unwrap_or(first).owner)
    }

    /// Slots owned by each server and their share of the ring.
    pub fn ownership(&self) -> BTreeMap<ServerId, SlotShare> {
        let mut slots: BTreeMap<ServerId, u64> = BTreeMap::new();
        for arc in &self.arcs {
            *slots.entry(arc.owner.clone()).or_default() += arc.len(self.num_slots);
        }
        slots
            .into_iter()
            .map(|(server, slots)| {
                let fraction = slots as f64 / self.num_slots as f64;
                (server, SlotShare { slots, fraction })
            })
            .collect()
    }
}
