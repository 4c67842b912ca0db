// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Channel configuration.
//!
//! The recognized options are:
//! - `endpoint`: WebSocket URI to connect to (`ws://` or `wss://`)
//! - `reconnect_interval_ms`: fixed delay between a close and the next attempt
//! - `max_reconnect_attempts`: retry ceiling before the channel gives up

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

const DEFAULT_ENDPOINT: &str = "ws://localhost:7890";
const DEFAULT_RECONNECT_INTERVAL_MS: u64 = 3000;
const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Configuration for a reconnecting channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Target URI (default: "ws://localhost:7890").
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Delay between a close event and the next reconnect attempt, in
    /// milliseconds (default: 3000).
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
    /// Reconnect attempts allowed before the channel fails permanently
    /// (default: 5). 0 disables reconnecting.
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_reconnect_interval_ms() -> u64 {
    DEFAULT_RECONNECT_INTERVAL_MS
}

fn default_max_reconnect_attempts() -> u32 {
    DEFAULT_MAX_RECONNECT_ATTEMPTS
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig {
            endpoint: default_endpoint(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
        }
    }
}

impl ChannelConfig {
    /// Create a config for the given endpoint with default retry settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        ChannelConfig {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// The backoff interval as a [`Duration`].
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    /// Check that the endpoint is a WebSocket URI and the interval is non-zero.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        let rest = endpoint
            .strip_prefix("ws://")
            .or_else(|| endpoint.strip_prefix("wss://"));
        match rest {
            Some(host) if !host.is_empty() => {}
            _ => return Err(Error::InvalidEndpoint(self.endpoint.clone())),
        }

        if self.reconnect_interval_ms == 0 {
            return Err(Error::Config(
                "reconnect_interval_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
