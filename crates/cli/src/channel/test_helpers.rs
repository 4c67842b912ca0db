// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for channel module tests.

#![allow(clippy::panic)]

use std::time::Duration;

use relink_core::{ChannelConfig, ChannelState};

use super::client::{ChannelEvent, ChannelEvents};

/// Config pointing at the mock endpoint.
pub fn mock_config(max_reconnect_attempts: u32, reconnect_interval_ms: u64) -> ChannelConfig {
    ChannelConfig {
        endpoint: "ws://mock.test".to_string(),
        reconnect_interval_ms,
        max_reconnect_attempts,
    }
}

/// Wait for the next event, failing the test if none arrives.
pub async fn next_event(events: &mut ChannelEvents) -> ChannelEvent {
    match tokio::time::timeout(Duration::from_secs(600), events.recv()).await {
        Ok(Some(event)) => event,
        Ok(None) => panic!("event stream ended"),
        Err(_) => panic!("timed out waiting for channel event"),
    }
}

/// Skip events until the channel reports `state`.
pub async fn wait_for_state(events: &mut ChannelEvents, state: ChannelState) {
    loop {
        if next_event(events).await == ChannelEvent::StateChanged(state) {
            return;
        }
    }
}

/// Let the driver task drain its queue.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Collect every event that is already queued.
pub fn drain(events: &mut ChannelEvents) -> Vec<ChannelEvent> {
    let mut out = Vec::new();
    while let Some(event) = events.try_recv() {
        out.push(event);
    }
    out
}
