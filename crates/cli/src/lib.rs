//! CLI tool for consistent hash rings.
//!
//! Provides commands for:
//! - Looking up the server for a set of keys
//! - Inspecting ring positions and ownership
//! - Measuring key movement when a server leaves

pub mod commands;
pub mod config;
pub mod telemetry;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
