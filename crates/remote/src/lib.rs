// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! relink-relay: WebSocket relay for JSON object messages.
//!
//! Broadcasts every JSON object a client sends to all connected clients,
//! including the sender. Used for demos and end-to-end tests of the
//! reconnecting channel.

pub mod error;
pub mod server;
pub mod state;

pub use error::{Error, Result};
pub use server::{run, serve, serve_with, RelayMessage};
pub use state::RelayState;
