// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Relay state shared by every connection task.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch};

/// Frames buffered per subscriber before a slow client starts lagging.
const BROADCAST_CAPACITY: usize = 1024;

/// Shared relay state: the fanout channel and the shutdown signal.
#[derive(Clone)]
pub struct RelayState {
    inner: Arc<RelayStateInner>,
}

struct RelayStateInner {
    /// Broadcast channel carrying accepted frames to every client.
    broadcast_tx: broadcast::Sender<String>,
    /// Flips to `true` once, when the relay is asked to stop.
    shutdown_tx: watch::Sender<bool>,
    /// Connected WebSocket clients.
    clients: AtomicUsize,
}

impl Default for RelayState {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayState {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (shutdown_tx, _) = watch::channel(false);
        RelayState {
            inner: Arc::new(RelayStateInner {
                broadcast_tx,
                shutdown_tx,
                clients: AtomicUsize::new(0),
            }),
        }
    }

    /// Receive every frame broadcast after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Fan a frame out to all subscribers. Returns how many will see it.
    pub fn broadcast(&self, frame: String) -> usize {
        self.inner.broadcast_tx.send(frame).unwrap_or(0)
    }

    /// Number of clients past the WebSocket handshake.
    pub fn client_count(&self) -> usize {
        self.inner.clients.load(Ordering::SeqCst)
    }

    /// Count a client until the returned guard is dropped.
    pub(crate) fn register(&self) -> ClientGuard {
        self.inner.clients.fetch_add(1, Ordering::SeqCst);
        ClientGuard {
            state: self.clone(),
        }
    }

    /// Stop accepting clients and close every open connection.
    pub fn shutdown(&self) {
        self.inner.shutdown_tx.send_replace(true);
    }

    pub fn is_shut_down(&self) -> bool {
        *self.inner.shutdown_tx.borrow()
    }

    /// Resolve once [`shutdown`](Self::shutdown) has been called.
    pub async fn shut_down(&self) {
        let mut rx = self.inner.shutdown_tx.subscribe();
        // The sender lives as long as `self`, so this only returns on shutdown
        let _ = rx.wait_for(|down| *down).await;
    }
}

/// Decrements the client count on drop.
pub(crate) struct ClientGuard {
    state: RelayState,
}

impl Drop for ClientGuard {
    fn drop(&mut self) {
        self.state.inner.clients.fetch_sub(1, Ordering::SeqCst);
    }
}
