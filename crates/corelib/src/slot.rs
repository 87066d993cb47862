//! Slot positions on the hash ring.
//!
//! A slot is a point in the circular domain `[0, num_slots)`. Slots are
//! plain integers; the modulus lives with the partitioner that produced them.

use std::fmt;

/// A position on the consistent hash ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Slot(pub u64);

impl Slot {
    /// Returns the raw position.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    /// Clockwise distance from `self` to `other` on a ring of `num_slots`.
    ///
    /// Both slots must already lie in `[0, num_slots)`.
    pub fn distance_to(self, other: Slot, num_slots: u64) -> u64 {
        if other.0 >= self.0 {
            other.0 - self.0
        } else {
            (num_slots - self.0) + other.0
        }
    }
}

impl From<u64> for Slot {
    fn from(value: u64) -> Self {
        Slot(value)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_forward() {
        assert_eq!(Slot(100).distance_to(Slot(200), 512), 100);
        assert_eq!(Slot(7).distance_to(Slot(7), 512), 0);
    }

    #[test]
    fn test_distance_wraps() {
        assert_eq!(Slot(500).distance_to(Slot(10), 512), 22);
        assert_eq!(Slot(511).distance_to(Slot(0), 512), 1);
    }

    #[test]
    fn test_ordering() {
        assert!(Slot(1) < Slot(2));
    }
}
