// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! relink - A reconnecting WebSocket channel for JSON messages.
//!
//! This crate provides the client behind the `relink` CLI tool: one
//! persistent connection with a small state machine, fixed-interval
//! reconnects, and JSON object payloads.
//!
//! # Main Components
//!
//! - [`Channel`] - Handle to a reconnecting connection
//! - [`ChannelEvents`] - State changes and inbound messages, in order
//! - [`Config`] - TOML configuration with a `[channel]` table
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use relink::{Channel, ChannelConfig, ChannelEvent};
//!
//! let (channel, mut events) = Channel::spawn(ChannelConfig::new("ws://localhost:7890"));
//! channel.connect();
//! while let Some(event) = events.recv().await {
//!     if let ChannelEvent::Message(payload) = event {
//!         println!("{:?}", payload);
//!     }
//! }
//! ```

mod cli;
mod commands;

pub mod channel;
pub mod config;
pub mod error;

pub use channel::{Channel, ChannelEvent, ChannelEvents};
pub use cli::{Cli, Command, ConnectArgs};
pub use config::{Config, Overrides};
pub use error::{Error, Result};
pub use relink_core::{ChannelConfig, ChannelState, Payload};

use tracing_subscriber::EnvFilter;

/// Execute a CLI command.
pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Connect(args) => commands::connect::run(args).await,
        Command::Config { config } => commands::config::run(config.as_deref()),
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug over info.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
