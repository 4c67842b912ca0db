// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "relink")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reconnecting WebSocket channel for JSON messages")]
#[command(
    long_about = "Reconnecting WebSocket channel for JSON messages.\n\n\
    Opens one persistent connection, forwards JSON lines from stdin, prints inbound \
    messages as JSON lines, and reconnects on a fixed interval when the link drops."
)]
pub struct Cli {
    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a channel and pipe JSON lines through it
    #[command(after_help = "\
Examples:
  relink connect ws://localhost:7890               Use default retry settings
  relink connect wss://host/ws --max-attempts 10   Allow more reconnects
  echo '{\"type\":\"ping\"}' | relink connect        Send one message, then exit")]
    Connect(ConnectArgs),

    /// Print the effective configuration as TOML
    Config {
        /// Read configuration from this file instead of the default locations
        #[arg(short, long, value_name = "path")]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConnectArgs {
    /// WebSocket endpoint (ws:// or wss://), overrides the config file
    pub endpoint: Option<String>,

    /// Read configuration from this file instead of the default locations
    #[arg(short, long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Delay between a close and the next reconnect attempt
    #[arg(long, value_name = "ms")]
    pub interval_ms: Option<u64>,

    /// Reconnect attempts allowed before giving up (0 disables reconnecting)
    #[arg(long, value_name = "n")]
    pub max_attempts: Option<u32>,

    /// Keep printing inbound messages this long after stdin closes
    #[arg(long, value_name = "ms", default_value_t = 0)]
    pub linger_ms: u64,
}

impl ConnectArgs {
    /// Flag values that take precedence over the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            reconnect_interval_ms: self.interval_ms,
            max_reconnect_attempts: self.max_attempts,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
