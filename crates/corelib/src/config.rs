//! Ring configuration.
//!
//! Both values are fixed for the lifetime of a ring. Changing either one
//! moves every position, so a ring is never reconfigured in place.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default size of the hash space.
pub const DEFAULT_NUM_SLOTS: u64 = 512;

/// Default number of virtual nodes placed per server.
pub const DEFAULT_NUM_VIRTUAL_NODES: usize = 9;

/// Construction-time settings for a [`HashRing`](crate::ring::HashRing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Size of the circular hash space `[0, num_slots)`.
    pub num_slots: u64,
    /// Virtual nodes placed on the ring for each server.
    pub num_virtual_nodes: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            num_slots: DEFAULT_NUM_SLOTS,
            num_virtual_nodes: DEFAULT_NUM_VIRTUAL_NODES,
        }
    }
}

impl RingConfig {
    pub fn new(num_slots: u64, num_virtual_nodes: usize) -> Self {
        Self {
            num_slots,
            num_virtual_nodes,
        }
    }

    /// Rejects configurations that cannot form a usable ring.
    pub fn validate(&self) -> Result<()> {
        if self.num_slots == 0 {
            return Err(Error::InvalidConfig("num_slots must be at least 1".into()));
        }
        if self.num_virtual_nodes == 0 {
            return Err(Error::InvalidConfig(
                "num_virtual_nodes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RingConfig::default();
        assert_eq!(config.num_slots, 512);
        assert_eq!(config.num_virtual_nodes, 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(matches!(
            RingConfig::new(0, 9).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            RingConfig::new(512, 0).validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: RingConfig = serde_json::from_str(r#"{"num_slots": 64}"#).unwrap();
        assert_eq!(config, RingConfig::new(64, DEFAULT_NUM_VIRTUAL_NODES));
    }
}
