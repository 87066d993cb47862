//! Sorted slot table backing the hash ring.
//!
//! `positions` is kept sorted ascending with no duplicates, and its contents
//! are exactly the key set of `owners`. Every mutation goes through
//! [`SlotTable::insert`] or [`SlotTable::remove_owned`], which keep both in
//! step using binary search.

use std::collections::{BTreeSet, HashMap};

use crate::server::ServerId;
use crate::slot::Slot;

/// Occupied ring positions and the server owning each one.
#[derive(Debug, Clone, Default)]
pub struct SlotTable {
    positions: Vec<Slot>,
    owners: HashMap<Slot, ServerId>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `server` at `slot`.
    ///
    /// If the slot is already occupied its owner is replaced and the previous
    /// owner is returned; the ring itself does not grow.
    pub fn insert(&mut self, slot: Slot, server: ServerId) -> Option<ServerId> {
        if let Err(idx) = self.positions.binary_search(&slot) {
            self.positions.insert(idx, slot);
        }
        self.owners.insert(slot, server)
    }

    /// Removes `slot` only if it is currently owned by `server`.
    ///
    /// Returns whether a position was removed. A slot taken over by another
    /// server keeps its new owner.
    pub fn remove_owned(&mut self, slot: Slot, server: &str) -> bool {
        match self.owners.get(&slot) {
            Some(owner) if owner.as_str() == server => {}
            _ => return false,
        }
        if let Ok(idx) = self.positions.binary_search(&slot) {
            self.positions.remove(idx);
        }
        self.owners.remove(&slot);
        true
    }

    /// First occupied position at or after `slot`, wrapping to the smallest
    /// position when `slot` is past the last one.
    pub fn successor(&self, slot: Slot) -> Option<Slot> {
        let first = *self.positions.first()?;
        let idx = self.positions.partition_point(|p| *p < slot);
        Some(self.positions.get(idx).copied().unwrap_or(first))
    }

    /// Server owning the clockwise-nearest position to `slot`.
    pub fn lookup(&self, slot: Slot) -> Option<&ServerId> {
        self.successor(slot).and_then(|pos| self.owners.get(&pos))
    }

    /// Owner of exactly `slot`, if that position is occupied.
    pub fn owner(&self, slot: Slot) -> Option<&ServerId> {
        self.owners.get(&slot)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Occupied positions in ascending order.
    pub fn positions(&self) -> &[Slot] {
        &self.positions
    }

    /// `(position, owner)` pairs in ring order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &ServerId)> + '_ {
        self.positions.iter().filter_map(|slot| {
            self.owners.get(slot).map(|owner| (*slot, owner))
        })
    }

    /// Distinct servers that own at least one position.
    pub fn servers(&self) -> BTreeSet<&ServerId> {
        self.owners.values().collect()
    }

    /// Checks that positions are strictly ascending and match the owner index.
    pub fn is_consistent(&self) -> bool {
        self.positions.windows(2).all(|w| w[0] < w[1])
            && self.positions.len() == self.owners.len()
            && self.positions.iter().all(|p| self.owners.contains_key(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ServerId {
        ServerId::from(s)
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut table = SlotTable::new();
        for slot in [40, 10, 30, 20] {
            assert_eq!(table.insert(Slot(slot), id("a")), None);
        }
        assert_eq!(table.positions(), &[Slot(10), Slot(20), Slot(30), Slot(40)]);
        assert!(table.is_consistent());
    }

    #[test]
    fn test_insert_collision_overwrites() {
        let mut table = SlotTable::new();
        table.insert(Slot(5), id("a"));
        let previous = table.insert(Slot(5), id("b"));

        assert_eq!(previous, Some(id("a")));
        assert_eq!(table.len(), 1);
        assert_eq!(table.owner(Slot(5)), Some(&id("b")));
        assert!(table.is_consistent());
    }

    #[test]
    fn test_remove_owned_only() {
        let mut table = SlotTable::new();
        table.insert(Slot(5), id("a"));
        table.insert(Slot(5), id("b"));

        assert!(!table.remove_owned(Slot(5), "a"));
        assert_eq!(table.owner(Slot(5)), Some(&id("b")));

        assert!(table.remove_owned(Slot(5), "b"));
        assert!(table.is_empty());
        assert!(!table.remove_owned(Slot(5), "b"));
        assert!(table.is_consistent());
    }

    #[test]
    fn test_successor_and_wrap() {
        let mut table = SlotTable::new();
        table.insert(Slot(10), id("a"));
        table.insert(Slot(20), id("b"));

        assert_eq!(table.successor(Slot(0)), Some(Slot(10)));
        assert_eq!(table.successor(Slot(10)), Some(Slot(10)));
        assert_eq!(table.successor(Slot(11)), Some(Slot(20)));
        assert_eq!(table.successor(Slot(21)), Some(Slot(10)));
        assert_eq!(table.lookup(Slot(21)), Some(&id("a")));
        assert_eq!(table.lookup(Slot(15)), Some(&id("b")));
    }

    #[test]
    fn test_empty_table() {
        let table = SlotTable::new();
        assert_eq!(table.successor(Slot(3)), None);
        assert_eq!(table.lookup(Slot(3)), None);
        assert!(table.servers().is_empty());
        assert!(table.is_consistent());
    }

    #[test]
    fn test_iter_in_ring_order() {
        let mut table = SlotTable::new();
        table.insert(Slot(9), id("b"));
        table.insert(Slot(1), id("a"));

        let pairs: Vec<_> = table.iter().map(|(s, o)| (s.get(), o.as_str())).collect();
        assert_eq!(pairs, vec![(1, "a"), (9, "b")]);
    }
}
