// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Channel status shared between the driver task and channel handles.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use relink_core::ChannelState;

/// Channel status visible to both the driver task and its owner.
///
/// Uses atomic fields for lock-free reads. Only the driver writes.
pub struct SharedChannelStatus {
    /// Current state, encoded with [`ChannelState::as_u8`].
    state: AtomicU8,
    /// Reconnect attempts since the last successful open.
    retry_count: AtomicU32,
}

impl SharedChannelStatus {
    /// Create a new shared status initialized to idle.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ChannelState::Idle.as_u8()),
            retry_count: AtomicU32::new(0),
        }
    }

    pub fn get(&self) -> ChannelState {
        ChannelState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn set(&self, state: ChannelState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count.load(Ordering::Acquire)
    }

    pub fn set_retry_count(&self, count: u32) {
        self.retry_count.store(count, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.get() == ChannelState::Open
    }

    /// Get a human-readable status string.
    pub fn status_string(&self) -> String {
        match self.get() {
            ChannelState::Connecting => {
                let attempt = self.retry_count();
                if attempt > 0 {
                    format!("connecting (attempt {})", attempt)
                } else {
                    "connecting".to_string()
                }
            }
            state => state.to_string(),
        }
    }
}

impl Default for SharedChannelStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
