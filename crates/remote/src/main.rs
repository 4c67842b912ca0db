// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! relink-relay: WebSocket relay server for relink channels.

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use relink_relay::{serve_with, Error, RelayState, Result};

/// relink-relay: broadcast JSON messages between WebSocket clients
#[derive(Parser, Debug)]
#[command(name = "relink-relay")]
#[command(about = "WebSocket relay server for relink channels")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let default = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    info!("Starting relink-relay");
    info!("  Bind address: {}", args.bind);

    let listener = TcpListener::bind(args.bind).await?;
    let state = RelayState::new();

    let signal_state = state.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal_state.shutdown(),
            Err(e) => warn!("Cannot listen for ctrl-c: {}", e),
        }
    });

    serve_with(listener, state).await
}
