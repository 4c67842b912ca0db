// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnecting channel handle and its driver task.
//!
//! [`Channel::spawn`] starts one driver task that owns the live transport,
//! any in-flight connection attempt, and the retry timer. The handle only
//! enqueues commands, so `connect`, `send`, and `disconnect` never block.
//! Everything the driver observes comes back, in order, on [`ChannelEvents`].

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Sleep;
use tracing::{debug, info, warn};

use relink_core::{codec, ChannelConfig, ChannelState, Payload};

use super::lifecycle::{CloseOutcome, Lifecycle};
use super::status::SharedChannelStatus;
use super::transport::{Connector, Transport, TransportFuture, TransportResult, WebSocketConnector};

/// Longest a single write or close may take before the connection is
/// treated as lost.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Notifications delivered to the channel owner.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The channel moved to a new state.
    StateChanged(ChannelState),
    /// A well-formed inbound message.
    Message(Payload),
    /// The connection closed and a reconnect will start after `delay`.
    ReconnectScheduled {
        /// Reconnect attempt number, starting at 1.
        attempt: u32,
        delay: Duration,
    },
    /// The retry ceiling was reached. The channel stays closed until the
    /// owner calls [`Channel::connect`] again.
    Failed {
        /// Reconnect attempts made before giving up.
        attempts: u32,
    },
}

/// Receiving side of a channel's event stream.
pub struct ChannelEvents {
    rx: mpsc::UnboundedReceiver<ChannelEvent>,
}

impl ChannelEvents {
    /// Wait for the next event.
    ///
    /// Returns `None` once the driver has stopped and every event was read.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        self.rx.recv().await
    }

    /// Take the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<ChannelEvent> {
        self.rx.try_recv().ok()
    }
}

/// Commands sent from the handle to the driver.
#[derive(Debug)]
enum Command {
    Connect,
    Send(String),
    Disconnect,
}

/// Handle to one reconnecting channel.
///
/// Dropping the handle stops the driver and closes the connection.
pub struct Channel {
    endpoint: String,
    commands: mpsc::UnboundedSender<Command>,
    status: Arc<SharedChannelStatus>,
}

impl Channel {
    /// Spawn a channel that dials WebSocket endpoints.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: ChannelConfig) -> (Self, ChannelEvents) {
        Self::spawn_with(config, WebSocketConnector)
    }

    /// Spawn a channel with a custom connector (for testing).
    pub fn spawn_with<C: Connector>(config: ChannelConfig, connector: C) -> (Self, ChannelEvents) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let status = Arc::new(SharedChannelStatus::new());

        let driver = Driver {
            endpoint: config.endpoint.clone(),
            interval: config.reconnect_interval(),
            connector,
            lifecycle: Lifecycle::new(config.max_reconnect_attempts),
            status: Arc::clone(&status),
            events: event_tx,
            transport: None,
            attempt: None,
            retry: None,
        };
        tokio::spawn(driver.run(command_rx));

        let channel = Channel {
            endpoint: config.endpoint,
            commands: command_tx,
            status,
        };
        (channel, ChannelEvents { rx: event_rx })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current state as last published by the driver.
    pub fn state(&self) -> ChannelState {
        self.status.get()
    }

    /// Reconnect attempts since the last successful open.
    pub fn retry_count(&self) -> u32 {
        self.status.retry_count()
    }

    /// Human-readable status, e.g. "connecting (attempt 2)".
    pub fn status_string(&self) -> String {
        self.status.status_string()
    }

    /// Open the connection. No-op while connecting or open.
    pub fn connect(&self) {
        self.command(Command::Connect);
    }

    /// Serialize `payload` and queue it for writing if the channel is open.
    ///
    /// Never fails: when the channel is not open, or the payload cannot be
    /// serialized, the message is dropped with a warning. Returns whether
    /// the message was queued. A queued message can still be lost if the
    /// connection closes before the driver writes it.
    pub fn send<T: Serialize + ?Sized>(&self, payload: &T) -> bool {
        let frame = match codec::encode(payload) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("dropping outbound message: {}", e);
                return false;
            }
        };

        let state = self.state();
        if state != ChannelState::Open {
            warn!("dropping outbound message: channel is {}", state);
            return false;
        }

        self.command(Command::Send(frame));
        true
    }

    /// Cancel any pending reconnect, close the connection, and stay closed.
    pub fn disconnect(&self) {
        self.command(Command::Disconnect);
    }

    fn command(&self, command: Command) {
        if self.commands.send(command).is_err() {
            // Only possible if the runtime shut the driver down
            debug!("channel driver for {} is gone", self.endpoint);
        }
    }
}

/// State owned by the driver task.
///
/// Only one handler runs at a time, so none of this needs locking.
struct Driver<C: Connector> {
    endpoint: String,
    interval: Duration,
    connector: C,
    lifecycle: Lifecycle,
    status: Arc<SharedChannelStatus>,
    events: mpsc::UnboundedSender<ChannelEvent>,
    /// The live connection. At most one exists at a time.
    transport: Option<C::Transport>,
    /// In-flight connection attempt. Dropping it abandons the attempt.
    attempt: Option<TransportFuture<'static, C::Transport>>,
    /// Pending reconnect. Dropping it cancels the reconnect.
    retry: Option<Pin<Box<Sleep>>>,
}

impl<C: Connector> Driver<C> {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },

                result = pending_attempt(&mut self.attempt) => {
                    self.attempt = None;
                    self.attempt_finished(result);
                }

                frame = next_frame(&mut self.transport) => {
                    self.frame_received(frame);
                }

                () = retry_elapsed(&mut self.retry) => {
                    self.retry = None;
                    self.retry_fired();
                }
            }
        }

        // Owner dropped the handle
        self.release().await;
        self.status.set(ChannelState::Closed);
        debug!("channel driver for {} stopped", self.endpoint);
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Connect => self.connect(),
            Command::Send(frame) => self.send(frame).await,
            Command::Disconnect => self.disconnect().await,
        }
    }

    fn connect(&mut self) {
        if !self.lifecycle.request_connect() {
            debug!("connect ignored: channel is {}", self.lifecycle.state());
            return;
        }
        self.retry = None;
        self.start_attempt();
        self.publish();
    }

    async fn send(&mut self, frame: String) {
        if self.lifecycle.state() != ChannelState::Open {
            warn!(
                "dropping outbound message: channel is {}",
                self.lifecycle.state()
            );
            return;
        }
        let Some(transport) = self.transport.as_mut() else {
            warn!("dropping outbound message: no live connection");
            return;
        };

        match tokio::time::timeout(WRITE_TIMEOUT, transport.send(frame)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("write to {} failed: {}", self.endpoint, e);
                self.transport = None;
                self.connection_lost();
            }
            Err(_) => {
                warn!("write to {} timed out after {:?}", self.endpoint, WRITE_TIMEOUT);
                self.transport = None;
                self.connection_lost();
            }
        }
    }

    async fn disconnect(&mut self) {
        self.retry = None;
        self.attempt = None;
        self.release().await;
        self.lifecycle.disconnected();
        self.publish();
        info!("disconnected from {}", self.endpoint);
    }

    fn start_attempt(&mut self) {
        debug!(
            "connecting to {} (attempt {})",
            self.endpoint,
            self.lifecycle.retry_count()
        );
        self.attempt = Some(self.connector.connect(&self.endpoint));
    }

    fn attempt_finished(&mut self, result: TransportResult<C::Transport>) {
        match result {
            Ok(transport) => {
                self.transport = Some(transport);
                self.lifecycle.opened();
                info!("connected to {}", self.endpoint);
                self.publish();
            }
            Err(e) => {
                warn!("{}: {}", self.endpoint, e);
                self.connection_lost();
            }
        }
    }

    fn frame_received(&mut self, frame: TransportResult<Option<String>>) {
        match frame {
            Ok(Some(text)) => match codec::decode(&text) {
                Ok(payload) => self.emit(ChannelEvent::Message(payload)),
                Err(e) => debug!("dropping inbound frame: {}", e),
            },
            Ok(None) => {
                info!("connection to {} closed by peer", self.endpoint);
                self.transport = None;
                self.connection_lost();
            }
            Err(e) => {
                warn!("read from {} failed: {}", self.endpoint, e);
                self.transport = None;
                self.connection_lost();
            }
        }
    }

    /// Shared close path for connect failures, read failures, failed or
    /// stalled writes, and peer closes.
    fn connection_lost(&mut self) {
        self.attempt = None;
        match self.lifecycle.closed() {
            CloseOutcome::Retry { attempt } => {
                debug!(
                    "reconnecting to {} in {:?} (attempt {}/{})",
                    self.endpoint,
                    self.interval,
                    attempt,
                    self.lifecycle.max_retries()
                );
                self.retry = Some(Box::pin(tokio::time::sleep(self.interval)));
                self.publish();
                self.emit(ChannelEvent::ReconnectScheduled {
                    attempt,
                    delay: self.interval,
                });
            }
            CloseOutcome::Exhausted { attempts } => {
                warn!(
                    "giving up on {} after {} reconnect attempts",
                    self.endpoint, attempts
                );
                self.publish();
                self.emit(ChannelEvent::Failed { attempts });
            }
        }
    }

    fn retry_fired(&mut self) {
        self.lifecycle.retry_started();
        self.start_attempt();
        self.publish();
    }

    /// Close and drop the live transport, if any.
    async fn release(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            match tokio::time::timeout(WRITE_TIMEOUT, transport.close()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("close of {} failed: {}", self.endpoint, e),
                Err(_) => debug!("close of {} timed out", self.endpoint),
            }
        }
    }

    /// Mirror the lifecycle into the shared status and announce state changes.
    fn publish(&mut self) {
        let state = self.lifecycle.state();
        self.status.set_retry_count(self.lifecycle.retry_count());
        if self.status.get() != state {
            self.status.set(state);
            self.emit(ChannelEvent::StateChanged(state));
        }
    }

    fn emit(&self, event: ChannelEvent) {
        // The owner may have stopped listening; the channel keeps running
        let _ = self.events.send(event);
    }
}

async fn pending_attempt<T>(
    attempt: &mut Option<TransportFuture<'static, T>>,
) -> TransportResult<T> {
    match attempt {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

async fn next_frame<T: Transport>(
    transport: &mut Option<T>,
) -> TransportResult<Option<String>> {
    match transport {
        Some(t) => t.recv().await,
        None => std::future::pending().await,
    }
}

async fn retry_elapsed(retry: &mut Option<Pin<Box<Sleep>>>) {
    match retry {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}
