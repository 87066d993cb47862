//! Core library for consistent hashing implementation.
//!
//! This crate provides the consistent hash ring and its building blocks:
//! - Ring configuration
//! - Slot positions and the SHA-256 partitioner
//! - Servers and virtual nodes
//! - The ring itself, its snapshots and builder
//! - Ownership views over the ring

pub mod config;
pub mod error;
pub mod partitioner;
pub mod ring;
pub mod server;
pub mod slot;
pub mod topology;
pub mod vnode;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use partitioner::Partitioner;
pub use ring::{HashRing, Ring, RingBuilder, RingSnapshot};
pub use server::ServerId;
pub use slot::Slot;
pub use topology::{SlotRange, SlotShare, Topology};
pub use vnode::VirtualNode;
