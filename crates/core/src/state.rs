// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection state of a channel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a reconnecting channel.
///
/// ```text
/// Idle ──connect()──► Connecting ──open──► Open
///                        ▲   │               │
///                  retry │   └──close──┐     │ close
///                        │             ▼     ▼
///                        └────────── Closed ◄┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    /// Created, `connect()` never called.
    Idle,
    /// A connection attempt is in flight.
    Connecting,
    /// Connected; sends are written to the wire.
    Open,
    /// Not connected. A reconnect may be pending.
    Closed,
}

impl ChannelState {
    /// Returns the string representation used in logs and status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelState::Idle => "idle",
            ChannelState::Connecting => "connecting",
            ChannelState::Open => "open",
            ChannelState::Closed => "closed",
        }
    }

    /// Compact encoding for lock-free storage in an atomic.
    pub fn as_u8(self) -> u8 {
        match self {
            ChannelState::Idle => 0,
            ChannelState::Connecting => 1,
            ChannelState::Open => 2,
            ChannelState::Closed => 3,
        }
    }

    /// Inverse of [`as_u8`](Self::as_u8). Unknown values map to `Closed`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => ChannelState::Idle,
            1 => ChannelState::Connecting,
            2 => ChannelState::Open,
            _ => ChannelState::Closed,
        }
    }

    /// Returns true while a connection is live or being established.
    ///
    /// `connect()` is a no-op in these states.
    pub fn is_active(&self) -> bool {
        matches!(self, ChannelState::Connecting | ChannelState::Open)
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
