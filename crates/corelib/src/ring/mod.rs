//! Consistent hash ring implementation.
//!
//! The ring manages slot positions and provides efficient lookup
//! operations for finding the server responsible for a key.

pub mod builder;
pub mod ring;
pub mod table;

pub use builder::RingBuilder;
pub use ring::{HashRing, RingSnapshot};
pub use table::SlotTable;

/// Alias for the main ring type (used by lib.rs).
pub type Ring = HashRing;
