//! CLI subcommands.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Context, Result};
use clap::Subcommand;
use corelib::{HashRing, RingConfig, ServerId, Slot, SlotShare};
use tracing::info;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the server responsible for each key.
    Lookup {
        /// Server to place on the ring, in order. Repeatable.
        #[arg(short, long = "server")]
        servers: Vec<String>,
        /// Keys to look up.
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Print ring positions and each server's share of the hash space.
    Inspect {
        #[arg(short, long = "server")]
        servers: Vec<String>,
    },
    /// Count how many synthetic keys change owner when a server is removed.
    Churn {
        #[arg(short, long = "server")]
        servers: Vec<String>,
        /// Server to remove.
        #[arg(long)]
        remove: String,
        /// Number of keys (`key-0` .. `key-N`) to sample.
        #[arg(long, default_value_t = 10_000)]
        keys: usize,
    },
}

#[derive(Debug, Clone)]
pub enum CommandResult {
    Lookups(Vec<(String, ServerId)>),
    Inspection {
        positions: Vec<(Slot, ServerId)>,
        shares: BTreeMap<ServerId, SlotShare>,
    },
    Churn {
        sampled: usize,
        moved: usize,
        removed_positions: usize,
    },
}

impl Command {
    pub fn execute(&self, config: RingConfig) -> Result<CommandResult> {
        match self {
            Command::Lookup { servers, keys } => {
                let ring = build_ring(config, servers)?;
                let lookups = keys
                    .iter()
                    .map(|key| {
                        let server = ring
                            .get_server(key)
                            .with_context(|| format!("lookup of {:?} failed", key))?;
                        Ok((key.clone(), server))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(CommandResult::Lookups(lookups))
            }
            Command::Inspect { servers } => {
                let ring = build_ring(config, servers)?;
                Ok(CommandResult::Inspection {
                    positions: ring.positions(),
                    shares: ring.topology().ownership(),
                })
            }
            Command::Churn {
                servers,
                remove,
                keys,
            } => {
                let ring = build_ring(config, servers)?;
                let sample: Vec<String> = (0..*keys).map(|i| format!("key-{}", i)).collect();
                let before = sample
                    .iter()
                    .map(|key| ring.get_server(key))
                    .collect::<corelib::Result<Vec<_>>>()
                    .context("ring has no servers")?;

                let removed_positions = ring.remove_server(remove);
                let moved = sample
                    .iter()
                    .zip(&before)
                    .filter(|(key, old)| ring.get_server(key).ok().as_ref() != Some(*old))
                    .count();
                info!(remove = %remove, moved, sampled = sample.len(), "churn measured");

                Ok(CommandResult::Churn {
                    sampled: sample.len(),
                    moved,
                    removed_positions,
                })
            }
        }
    }
}

fn build_ring(config: RingConfig, servers: &[String]) -> Result<HashRing> {
    let ring = HashRing::with_config(config)?;
    for server in servers {
        ring.add_server(server.as_str());
    }
    Ok(ring)
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Lookups(lookups) => {
                for (key, server) in lookups {
                    writeln!(f, "{} -> {}", key, server)?;
                }
            }
            CommandResult::Inspection { positions, shares } => {
                writeln!(f, "positions:")?;
                for (slot, server) in positions {
                    writeln!(f, "  {:>8}  {}", slot, server)?;
                }
                writeln!(f, "ownership:")?;
                for (server, share) in shares {
                    writeln!(
                        f,
                        "  {}  {} slots ({:.2}%)",
                        server,
                        share.slots,
                        share.fraction * 100.0
                    )?;
                }
            }
            CommandResult::Churn {
                sampled,
                moved,
                removed_positions,
            } => {
                let pct = if *sampled == 0 {
                    0.0
                } else {
                    *moved as f64 / *sampled as f64 * 100.0
                };
                writeln!(f, "removed positions: {}", removed_positions)?;
                writeln!(f, "moved keys: {}/{} ({:.2}%)", moved, sampled, pct)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servers() -> Vec<String> {
        vec!["Server1".into(), "Server2".into(), "Server3".into()]
    }

    #[test]
    fn test_lookup_reference_keys() {
        let command = Command::Lookup {
            servers: servers(),
            keys: vec![
                "ClientRequest1".into(),
                "ClientRequest2".into(),
                "ClientRequest3".into(),
            ],
        };
        let result = command.execute(RingConfig::default()).unwrap();
        assert_eq!(
            result.to_string(),
            "ClientRequest1 -> Server3\nClientRequest2 -> Server1\nClientRequest3 -> Server2\n"
        );
    }

    #[test]
    fn test_lookup_without_servers_fails() {
        let command = Command::Lookup {
            servers: vec![],
            keys: vec!["k".into()],
        };
        let err = command.execute(RingConfig::default()).unwrap_err();
        assert!(err.downcast_ref::<corelib::Error>().is_some());
    }

    #[test]
    fn test_inspect() {
        let command = Command::Inspect { servers: servers() };
        match command.execute(RingConfig::default()).unwrap() {
            CommandResult::Inspection { positions, shares } => {
                assert_eq!(positions.len(), 27);
                assert_eq!(shares.values().map(|s| s.slots).sum::<u64>(), 512);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_churn_only_moves_removed_servers_keys() {
        let command = Command::Churn {
            servers: servers(),
            remove: "Server2".into(),
            keys: 300,
        };
        let config = RingConfig::default();
        let ring = build_ring(config, &servers()).unwrap();
        let owned_by_removed = (0..300)
            .filter(|i| ring.get_server(&format!("key-{}", i)).unwrap() == "Server2")
            .count();

        match command.execute(config).unwrap() {
            CommandResult::Churn {
                sampled,
                moved,
                removed_positions,
            } => {
                assert_eq!(sampled, 300);
                assert_eq!(removed_positions, 9);
                assert_eq!(moved, owned_by_removed);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
