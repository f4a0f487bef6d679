// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for WebSocket communication.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket connections for production
//! - Mock transports for unit testing
//!
//! Transports move text frames only; encoding, validation and decoding happen
//! in the client.

use std::future::Future;
use std::pin::Pin;

/// Close code for a normal, intentional closure.
pub const CLOSE_NORMAL: u16 = 1000;

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection attempt did not complete in time.
    #[error("connection timed out after {0} ms")]
    Timeout(u64),

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

/// Why the remote side closed the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    pub code: Option<u16>,
    pub reason: String,
}

impl CloseInfo {
    pub fn new(code: Option<u16>, reason: impl Into<String>) -> Self {
        CloseInfo {
            code,
            reason: reason.into(),
        }
    }

    /// A close is intentional only with the normal closure code.
    pub fn is_normal(&self) -> bool {
        self.code == Some(CLOSE_NORMAL)
    }
}

/// Something received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// A text frame.
    Text(String),
    /// The connection was closed by the remote side or the network.
    Closed(CloseInfo),
}

/// A handshake in flight. It owns everything it needs, so the caller can keep
/// serving other work while it runs, or drop it to abandon the attempt.
pub type Dial<C> = Pin<Box<dyn Future<Output = TransportResult<C>> + Send + 'static>>;

/// Transport trait for WebSocket-like communication.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait Transport: Send {
    /// An established connection, produced by [`Transport::dial`].
    type Connection: Send + 'static;

    /// Start a handshake with a remote server.
    fn dial(&self, url: &str) -> Dial<Self::Connection>;

    /// Adopt a connection returned by a completed [`Transport::dial`].
    fn attach(&mut self, connection: Self::Connection);

    /// Dial and attach in one step.
    fn connect(
        &mut self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        let dial = self.dial(url);
        Box::pin(async move {
            let connection = dial.await?;
            self.attach(connection);
            Ok(())
        })
    }

    /// Close the connection with the given close code.
    fn disconnect(
        &mut self,
        code: u16,
        reason: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>>;

    /// Send a text frame.
    fn send(
        &mut self,
        text: String,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>>;

    /// Receive the next frame or close notification.
    fn recv(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<Incoming>> + Send + '_>>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

/// Client-side WebSocket stream.
pub type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// WebSocket transport implementation using tokio-tungstenite.
pub struct WebSocketTransport {
    /// The WebSocket connection, if connected.
    ws: Option<WebSocketConnection>,
}

/// Internal WebSocket connection wrapper.
struct WebSocketConnection {
    sink: futures_util::stream::SplitSink<WsStream, tokio_tungstenite::tungstenite::Message>,
    stream: futures_util::stream::SplitStream<WsStream>,
}

impl WebSocketTransport {
    /// Create a new WebSocket transport.
    pub fn new() -> Self {
        WebSocketTransport { ws: None }
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for WebSocketTransport {
    type Connection = WsStream;

    fn dial(&self, url: &str) -> Dial<WsStream> {
        let url = url.to_string();
        Box::pin(async move {
            let (ws_stream, _) = tokio_tungstenite::connect_async(&url)
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
            Ok(ws_stream)
        })
    }

    fn attach(&mut self, connection: WsStream) {
        use futures_util::StreamExt;

        let (sink, stream) = connection.split();
        self.ws = Some(WebSocketConnection { sink, stream });
    }

    fn disconnect(
        &mut self,
        code: u16,
        reason: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        let reason = reason.to_string();
        Box::pin(async move {
            use futures_util::SinkExt;
            use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
            use tokio_tungstenite::tungstenite::protocol::CloseFrame;
            use tokio_tungstenite::tungstenite::Message;

            if let Some(mut ws) = self.ws.take() {
                let frame = CloseFrame {
                    code: CloseCode::from(code),
                    reason: reason.into(),
                };
                // Best effort: the peer may already be gone
                let _ = ws.sink.send(Message::Close(Some(frame))).await;
                let _ = ws.sink.close().await;
            }
            Ok(())
        })
    }

    fn send(
        &mut self,
        text: String,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            use futures_util::SinkExt;
            use tokio_tungstenite::tungstenite::Message;

            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            if let Err(e) = ws.sink.send(Message::Text(text.into())).await {
                // Connection is broken, clear it
                self.ws = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            // Flush to ensure the data is actually sent and we detect connection failures
            if let Err(e) = ws.sink.flush().await {
                self.ws = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            Ok(())
        })
    }

    fn recv(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<Incoming>> + Send + '_>> {
        Box::pin(async move {
            use futures_util::StreamExt;
            use tokio_tungstenite::tungstenite::Message;

            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            loop {
                match ws.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return Ok(Incoming::Text(text.as_str().to_string()));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        self.ws = None;
                        let info = match frame {
                            Some(frame) => {
                                CloseInfo::new(Some(frame.code.into()), frame.reason.as_str())
                            }
                            None => CloseInfo::new(None, ""),
                        };
                        return Ok(Incoming::Closed(info));
                    }
                    Some(Ok(_)) => {
                        // Ping/pong are answered by tungstenite; binary frames are ignored
                        continue;
                    }
                    Some(Err(e)) => {
                        // Connection is broken, clear it
                        self.ws = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                    None => {
                        // Stream ended, clear connection
                        self.ws = None;
                        return Ok(Incoming::Closed(CloseInfo::new(None, "stream ended")));
                    }
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}
