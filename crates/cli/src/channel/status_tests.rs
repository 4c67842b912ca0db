// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn shared_status_initial_values() {
    let status = SharedChannelStatus::new();
    assert_eq!(status.get(), ChannelState::Idle);
    assert_eq!(status.retry_count(), 0);
    assert!(!status.is_open());
}

#[test]
fn shared_status_transitions() {
    let status = SharedChannelStatus::new();

    status.set(ChannelState::Connecting);
    status.set_retry_count(1);
    assert_eq!(status.get(), ChannelState::Connecting);
    assert_eq!(status.retry_count(), 1);
    assert!(!status.is_open());

    status.set(ChannelState::Open);
    status.set_retry_count(0);
    assert!(status.is_open());

    status.set(ChannelState::Closed);
    assert_eq!(status.get(), ChannelState::Closed);
    assert!(!status.is_open());
}

#[test]
fn shared_status_string() {
    let status = SharedChannelStatus::new();
    assert_eq!(status.status_string(), "idle");

    status.set(ChannelState::Connecting);
    assert_eq!(status.status_string(), "connecting");

    status.set_retry_count(3);
    assert_eq!(status.status_string(), "connecting (attempt 3)");

    status.set(ChannelState::Open);
    status.set_retry_count(0);
    assert_eq!(status.status_string(), "open");

    status.set(ChannelState::Closed);
    assert_eq!(status.status_string(), "closed");
}
