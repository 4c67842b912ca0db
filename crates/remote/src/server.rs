// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket relay implementation.
//!
//! Every text frame holding a JSON object is broadcast to all connected
//! clients, the sender included. Anything else earns the sender an error
//! reply and goes nowhere.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use relink_core::codec;

use crate::error::Result;
use crate::state::RelayState;

/// Messages the relay itself originates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayMessage {
    /// The client's frame was rejected.
    Error { message: String },
}

impl RelayMessage {
    pub fn error(message: impl Into<String>) -> Self {
        RelayMessage::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// What to do with one inbound text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    /// Fan the frame out to every client.
    Broadcast(String),
    /// Answer the sender only.
    Reply(RelayMessage),
}

/// Bind `addr` and relay until the process exits.
pub async fn run(addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener).await
}

/// Relay clients accepted on `listener` with fresh state.
pub async fn serve(listener: TcpListener) -> Result<()> {
    serve_with(listener, RelayState::new()).await
}

/// Relay clients accepted on `listener` until `state` is shut down.
pub async fn serve_with(listener: TcpListener, state: RelayState) -> Result<()> {
    info!("Listening on: {}", listener.local_addr()?);

    loop {
        tokio::select! {
            _ = state.shut_down() => {
                info!("Relay shutting down");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer_addr) = accepted?;
                let state = state.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, peer_addr, state).await {
                        error!("Connection error from {}: {}", peer_addr, e);
                    }
                });
            }
        }
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: RelayState,
) -> Result<()> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let _client = state.register();
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    // Subscribe before reading so the client sees its own first frame
    let mut broadcast_rx = state.subscribe();

    loop {
        tokio::select! {
            _ = state.shut_down() => {
                let _ = ws_sink.send(Message::Close(None)).await;
                break;
            }

            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => match handle_frame(text.as_str()) {
                        Action::Broadcast(frame) => {
                            let receivers = state.broadcast(frame);
                            debug!("Relayed frame from {} to {} clients", peer_addr, receivers);
                        }
                        Action::Reply(reply) => {
                            ws_sink.send(Message::Text(reply.to_json()?.into())).await?;
                        }
                    },
                    Some(Ok(Message::Close(_))) => {
                        info!("Client {} disconnected", peer_addr);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        ws_sink.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(_)) => {
                        // Binary, Pong, and raw frames are not relayed
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error from {}: {}", peer_addr, e);
                        break;
                    }
                    None => {
                        info!("Client {} stream ended", peer_addr);
                        break;
                    }
                }
            }

            broadcast = broadcast_rx.recv() => {
                match broadcast {
                    Ok(frame) => {
                        if let Err(e) = ws_sink.send(Message::Text(frame.into())).await {
                            warn!("Failed to send broadcast to {}: {}", peer_addr, e);
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!("Client {} lagged by {} messages", peer_addr, n);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Decide what to do with a text frame.
pub(crate) fn handle_frame(text: &str) -> Action {
    match codec::decode(text) {
        Ok(_) => Action::Broadcast(text.to_string()),
        Err(e) => {
            debug!("Rejected frame: {}", e);
            Action::Reply(RelayMessage::error(e.to_string()))
        }
    }
}
