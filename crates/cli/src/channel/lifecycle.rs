// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle state machine.
//!
//! Pure bookkeeping: no I/O, no timers. The channel driver reports what
//! happened on the wire and acts on the returned decisions.

use relink_core::ChannelState;

/// What the driver should do after a connection closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Wait out the backoff interval, then make reconnect attempt `attempt`.
    Retry { attempt: u32 },
    /// The retry ceiling is reached; stay closed.
    Exhausted { attempts: u32 },
}

/// Tracks channel state and the reconnect budget.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: ChannelState,
    retry_count: u32,
    max_retries: u32,
}

impl Lifecycle {
    /// Create a lifecycle in the `Idle` state.
    pub fn new(max_retries: u32) -> Self {
        Lifecycle {
            state: ChannelState::Idle,
            retry_count: 0,
            max_retries,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Reconnect attempts made since the last successful open.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Handle an explicit `connect()` request.
    ///
    /// Returns true if a connection attempt should start. A manual connect
    /// from `Idle` or `Closed` starts with a fresh retry budget.
    pub fn request_connect(&mut self) -> bool {
        if self.state.is_active() {
            return false;
        }
        self.state = ChannelState::Connecting;
        self.retry_count = 0;
        true
    }

    /// The pending attempt produced a live connection.
    pub fn opened(&mut self) {
        self.state = ChannelState::Open;
        self.retry_count = 0;
    }

    /// The live connection or pending attempt failed.
    ///
    /// Errors and closes are not distinguished; both land here.
    pub fn closed(&mut self) -> CloseOutcome {
        self.state = ChannelState::Closed;
        if self.retry_count < self.max_retries {
            CloseOutcome::Retry {
                attempt: self.retry_count + 1,
            }
        } else {
            CloseOutcome::Exhausted {
                attempts: self.retry_count,
            }
        }
    }

    /// The backoff interval elapsed; a reconnect attempt is starting.
    ///
    /// Returns the attempt number.
    pub fn retry_started(&mut self) -> u32 {
        self.retry_count += 1;
        self.state = ChannelState::Connecting;
        self.retry_count
    }

    /// Explicit `disconnect()`.
    pub fn disconnected(&mut self) {
        self.state = ChannelState::Closed;
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
