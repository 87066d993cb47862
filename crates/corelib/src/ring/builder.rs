//! Builder for [`HashRing`].

use crate::config::RingConfig;
use crate::error::Result;
use crate::ring::ring::HashRing;
use crate::server::ServerId;

/// Configures a ring and its initial servers.
///
/// Servers are added in the order given, which matters when two of them
/// collide on a slot.
#[derive(Debug, Clone, Default)]
pub struct RingBuilder {
    config: RingConfig,
    servers: Vec<ServerId>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: RingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_slots(mut self, num_slots: u64) -> Self {
        self.config.num_slots = num_slots;
        self
    }

    pub fn with_vnodes(mut self, num_virtual_nodes: usize) -> Self {
        self.config.num_virtual_nodes = num_virtual_nodes;
        self
    }

    pub fn add_server(mut self, server: impl Into<ServerId>) -> Self {
        self.servers.push(server.into());
        self
    }

    pub fn add_servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ServerId>,
    {
        self.servers.extend(servers.into_iter().map(Into::into));
        self
    }

    /// Validates the configuration and builds the ring.
    pub fn build(self) -> Result<HashRing> {
        let ring = HashRing::with_config(self.config)?;
        for server in self.servers {
            ring.add_server(server);
        }
        Ok(ring)
    }
}
