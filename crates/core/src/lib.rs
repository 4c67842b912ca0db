// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! relink-core: Shared types for the relink reconnecting channel.
//!
//! This crate provides the wire codec, connection state, and configuration
//! types used by both the `relink` client and the `relink-relay` server.

pub mod codec;
pub mod config;
pub mod error;
pub mod state;

pub use codec::{decode, encode, Payload};
pub use config::ChannelConfig;
pub use error::{Error, Result};
pub use state::ChannelState;
