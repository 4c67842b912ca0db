// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for WebSocket communication.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket connections for production
//! - Mock transports for unit testing
//!
//! A [`Connector`] produces one connected [`Transport`] per attempt. The
//! channel never reuses a transport after it has failed or closed.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by transport operations.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// A live, bidirectional text-frame connection.
pub trait Transport: Send + 'static {
    /// Write one text frame.
    fn send(&mut self, frame: String) -> TransportFuture<'_, ()>;

    /// Receive the next text frame.
    ///
    /// Returns `None` once the peer has closed the connection. Must be
    /// cancel-safe: dropping the future before it completes loses no frame.
    fn recv(&mut self) -> TransportFuture<'_, Option<String>>;

    /// Close the connection, releasing the underlying socket.
    fn close(&mut self) -> TransportFuture<'_, ()>;
}

/// Opens new transports to an endpoint.
pub trait Connector: Send + 'static {
    /// The transport produced by a successful attempt.
    type Transport: Transport;

    /// Start a connection attempt.
    ///
    /// The returned future owns everything it needs, so the attempt can be
    /// abandoned at any point by dropping it.
    fn connect(&self, endpoint: &str) -> TransportFuture<'static, Self::Transport>;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport implementation using tokio-tungstenite.
pub struct WebSocketTransport {
    /// The WebSocket connection, cleared once it breaks or closes.
    ws: Option<WebSocketConnection>,
}

/// Internal WebSocket connection wrapper.
struct WebSocketConnection {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
}

impl WebSocketTransport {
    fn new(ws: WsStream) -> Self {
        let (sink, stream) = ws.split();
        WebSocketTransport {
            ws: Some(WebSocketConnection { sink, stream }),
        }
    }

    /// Check if the underlying socket is still usable.
    pub fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}

impl Transport for WebSocketTransport {
    fn send(&mut self, frame: String) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            if let Err(e) = ws.sink.send(Message::Text(frame.into())).await {
                // Connection is broken, clear it
                self.ws = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            // Flush so a dead peer is detected on this write, not the next one
            if let Err(e) = ws.sink.flush().await {
                self.ws = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<String>> {
        Box::pin(async move {
            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            loop {
                match ws.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return Ok(Some(text.as_str().to_owned()));
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        self.ws = None;
                        return Ok(None);
                    }
                    Some(Ok(_)) => {
                        // Ping/pong are answered by tungstenite; binary frames are not ours
                        continue;
                    }
                    Some(Err(e)) => {
                        self.ws = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                }
            }
        })
    }

    fn close(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut ws) = self.ws.take() {
                ws.sink
                    .close()
                    .await
                    .map_err(|e| TransportError::SendFailed(e.to_string()))?;
            }
            Ok(())
        })
    }
}

/// Connector that dials WebSocket endpoints with `connect_async`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
    type Transport = WebSocketTransport;

    fn connect(&self, endpoint: &str) -> TransportFuture<'static, WebSocketTransport> {
        let endpoint = endpoint.to_string();
        Box::pin(async move {
            let (ws, _) = tokio_tungstenite::connect_async(endpoint.as_str())
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
            Ok(WebSocketTransport::new(ws))
        })
    }
}
