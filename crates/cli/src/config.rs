//! Command-line configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use corelib::RingConfig;
use tracing::debug;

use crate::commands::Command;
use crate::telemetry;

#[derive(Debug, Parser)]
#[command(
    name = "consistent-hash",
    version,
    about = "Map keys to servers with a consistent hash ring"
)]
pub struct CliConfig {
    /// JSON ring config, e.g. `{"num_slots": 512, "num_virtual_nodes": 9}`.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Size of the hash space (overrides the config file).
    #[arg(long, global = true)]
    pub slots: Option<u64>,

    /// Virtual nodes per server (overrides the config file).
    #[arg(long, global = true)]
    pub vnodes: Option<usize>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Defaults, then the config file, then explicit flags.
    pub fn ring_config(&self) -> Result<RingConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => RingConfig::default(),
        };
        if let Some(slots) = self.slots {
            config.num_slots = slots;
        }
        if let Some(vnodes) = self.vnodes {
            config.num_virtual_nodes = vnodes;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn run(self) -> Result<()> {
        telemetry::init(&self.log_level);
        let ring_config = self.ring_config()?;
        debug!(?ring_config, "building ring");

        let result = self.command.execute(ring_config)?;
        print!("{}", result);
        Ok(())
    }
}
