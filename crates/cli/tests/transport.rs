// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end tests for the reconnecting channel.
//!
//! These tests run `Channel` and `WebSocketTransport` against an in-process
//! `relink-relay` bound to a random local port.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::json;
use tokio::net::TcpListener;

use relink::channel::{Connector, Transport, WebSocketConnector};
use relink::{Channel, ChannelConfig, ChannelEvent, ChannelEvents, ChannelState, Payload};
use relink_relay::RelayState;

/// Returns timeout duration, longer for CI environments.
fn timeout() -> Duration {
    if std::env::var("CI").is_ok() {
        Duration::from_secs(30)
    } else {
        Duration::from_secs(5)
    }
}

/// An in-process relay that can be stopped and restarted on the same port.
struct TestRelay {
    addr: SocketAddr,
    state: RelayState,
}

impl TestRelay {
    async fn start() -> Self {
        Self::start_on("127.0.0.1:0".parse().unwrap()).await
    }

    async fn start_on(addr: SocketAddr) -> Self {
        // A stopped relay releases its port asynchronously
        let mut bound = TcpListener::bind(addr).await;
        for _ in 0..50 {
            if bound.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            bound = TcpListener::bind(addr).await;
        }
        let listener = bound.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = RelayState::new();

        let serve_state = state.clone();
        tokio::spawn(async move {
            let _ = relink_relay::serve_with(listener, serve_state).await;
        });

        TestRelay { addr, state }
    }

    fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Stop accepting and drop every client.
    fn stop(&self) {
        self.state.shutdown();
    }

    async fn wait_for_clients(&self, n: usize) {
        tokio::time::timeout(timeout(), async {
            while self.state.client_count() != n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("relay clients did not settle");
    }
}

fn config(endpoint: String, max_reconnect_attempts: u32, interval_ms: u64) -> ChannelConfig {
    ChannelConfig {
        endpoint,
        reconnect_interval_ms: interval_ms,
        max_reconnect_attempts,
    }
}

fn payload(value: serde_json::Value) -> Payload {
    value.as_object().unwrap().clone()
}

async fn next_event(events: &mut ChannelEvents) -> ChannelEvent {
    match tokio::time::timeout(timeout(), events.recv()).await {
        Ok(Some(event)) => event,
        Ok(None) => panic!("event stream ended"),
        Err(_) => panic!("timed out waiting for channel event"),
    }
}

async fn wait_for_state(events: &mut ChannelEvents, state: ChannelState) {
    while next_event(events).await != ChannelEvent::StateChanged(state) {}
}

async fn next_message(events: &mut ChannelEvents) -> Payload {
    loop {
        if let ChannelEvent::Message(payload) = next_event(events).await {
            return payload;
        }
    }
}

/// A port with nothing listening on it.
async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[tokio::test]
async fn test_websocket_transport_round_trip() {
    let relay = TestRelay::start().await;

    let mut transport = WebSocketConnector.connect(&relay.url()).await.unwrap();
    assert!(transport.is_connected());

    transport.send(r#"{"hello":"relay"}"#.to_string()).await.unwrap();
    let frame = tokio::time::timeout(timeout(), transport.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(frame.as_deref(), Some(r#"{"hello":"relay"}"#));

    transport.close().await.unwrap();
    assert!(!transport.is_connected());
    relay.wait_for_clients(0).await;
}

#[tokio::test]
async fn test_websocket_connector_refused() {
    let addr = unused_addr().await;
    let result = WebSocketConnector.connect(&format!("ws://{}", addr)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_channel_echo_through_relay() {
    let relay = TestRelay::start().await;
    let (channel, mut events) = Channel::spawn(config(relay.url(), 5, 100));

    channel.connect();
    assert_eq!(
        next_event(&mut events).await,
        ChannelEvent::StateChanged(ChannelState::Connecting)
    );
    assert_eq!(
        next_event(&mut events).await,
        ChannelEvent::StateChanged(ChannelState::Open)
    );

    channel.send(&json!({"type": "greeting", "n": 1}));
    assert_eq!(
        next_message(&mut events).await,
        payload(json!({"type": "greeting", "n": 1}))
    );
}

#[tokio::test]
async fn test_two_channels_share_a_relay() {
    let relay = TestRelay::start().await;
    let (alice, mut alice_events) = Channel::spawn(config(relay.url(), 5, 100));
    let (bob, mut bob_events) = Channel::spawn(config(relay.url(), 5, 100));

    alice.connect();
    bob.connect();
    wait_for_state(&mut alice_events, ChannelState::Open).await;
    wait_for_state(&mut bob_events, ChannelState::Open).await;
    relay.wait_for_clients(2).await;

    for i in 0..10 {
        alice.send(&json!({"seq": i}));
    }
    for i in 0..10 {
        assert_eq!(next_message(&mut bob_events).await, payload(json!({"seq": i})));
    }

    bob.send(&json!({"reply": true}));
    // Alice sees her own ten frames first, then Bob's
    for _ in 0..10 {
        next_message(&mut alice_events).await;
    }
    assert_eq!(
        next_message(&mut alice_events).await,
        payload(json!({"reply": true}))
    );
}

#[tokio::test]
async fn test_channel_reconnects_after_relay_restart() {
    let relay = TestRelay::start().await;
    let addr = relay.addr;
    let (channel, mut events) = Channel::spawn(config(relay.url(), 5, 200));

    channel.connect();
    wait_for_state(&mut events, ChannelState::Open).await;
    relay.wait_for_clients(1).await;

    relay.stop();
    assert_eq!(
        next_event(&mut events).await,
        ChannelEvent::StateChanged(ChannelState::Closed)
    );
    assert_eq!(
        next_event(&mut events).await,
        ChannelEvent::ReconnectScheduled {
            attempt: 1,
            delay: Duration::from_millis(200),
        }
    );

    let relay = TestRelay::start_on(addr).await;
    wait_for_state(&mut events, ChannelState::Open).await;
    assert_eq!(channel.retry_count(), 0);

    channel.send(&json!({"after": "restart"}));
    assert_eq!(
        next_message(&mut events).await,
        payload(json!({"after": "restart"}))
    );
    relay.wait_for_clients(1).await;
}

#[tokio::test]
async fn test_channel_gives_up_on_unreachable_endpoint() {
    let addr = unused_addr().await;
    let (channel, mut events) = Channel::spawn(config(format!("ws://{}", addr), 2, 20));

    channel.connect();
    loop {
        match next_event(&mut events).await {
            ChannelEvent::Failed { attempts } => {
                assert_eq!(attempts, 2);
                break;
            }
            ChannelEvent::Message(_) => panic!("no messages expected"),
            _ => {}
        }
    }
    assert_eq!(channel.state(), ChannelState::Closed);
    assert_eq!(channel.status_string(), "closed");
}

#[tokio::test]
async fn test_disconnect_closes_relay_connection() {
    let relay = TestRelay::start().await;
    let (channel, mut events) = Channel::spawn(config(relay.url(), 5, 100));

    channel.connect();
    wait_for_state(&mut events, ChannelState::Open).await;
    relay.wait_for_clients(1).await;

    channel.disconnect();
    wait_for_state(&mut events, ChannelState::Closed).await;
    relay.wait_for_clients(0).await;

    // No reconnect follows a manual disconnect
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(events.try_recv().is_none());
    assert_eq!(relay.state.client_count(), 0);
}
