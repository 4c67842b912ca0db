// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnecting client channel.
//!
//! Wraps one persistent WebSocket connection, exposes its state, and
//! reconnects on a fixed interval when the connection drops.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐ commands ┌─────────────┐     ┌─────────────┐
//! │   Channel   │─────────►│   Driver    │────►│  Transport  │
//! │  (handle)   │          │   (task)    │◄────│   (trait)   │
//! └─────────────┘          └─────────────┘     └─────────────┘
//!        ▲                        │
//!        │ state                  │ events
//!        │                        ▼
//! ┌─────────────┐          ┌─────────────┐
//! │SharedStatus │          │ChannelEvents│
//! └─────────────┘          └─────────────┘
//! ```
//!
//! # Features
//!
//! - Non-blocking `connect`, `send`, `disconnect`
//! - Fixed-interval reconnect bounded by `max_reconnect_attempts`
//! - In-order delivery of decoded messages; malformed frames are dropped
//! - Injectable connector for testing

mod client;
mod lifecycle;
mod status;
mod transport;

pub use client::{Channel, ChannelEvent, ChannelEvents, WRITE_TIMEOUT};
pub use lifecycle::{CloseOutcome, Lifecycle};
pub use status::SharedChannelStatus;
pub use transport::{
    Connector, Transport, TransportError, TransportFuture, TransportResult, WebSocketConnector,
    WebSocketTransport,
};

#[cfg(test)]
pub(crate) mod test_helpers;
