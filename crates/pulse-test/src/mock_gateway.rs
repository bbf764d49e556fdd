//! Scripted gateway server for integration tests.
//!
//! [`MockGateway`] listens on an ephemeral loopback port. Each client
//! connection is accepted as a [`MockSession`] that the test drives by
//! hand: send frames, read what the client sent, close the socket.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{WebSocketStream, accept_async};
use tracing::{debug, trace};

/// How long the receive helpers wait before giving up.
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors from the mock server.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// Socket-level failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// `WebSocket` handshake or frame failure.
    #[error("websocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),
    /// Nothing happened within the timeout.
    #[error("timed out")]
    Timeout,
}

impl From<tungstenite::Error> for MockError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

/// A gateway server that hands out scripted sessions.
#[derive(Debug)]
pub struct MockGateway {
    listener: TcpListener,
    addr: SocketAddr,
}

impl MockGateway {
    /// Listen on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound.
    pub async fn bind() -> Result<Self, MockError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        debug!(%addr, "Mock gateway listening");
        Ok(Self { listener, addr })
    }

    /// Base URL to configure a client with.
    #[must_use]
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Accept the next client, waiting at most [`DEFAULT_RECV_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`MockError::Timeout`] if no client connects in time.
    pub async fn accept(&self) -> Result<MockSession, MockError> {
        self.accept_within(DEFAULT_RECV_TIMEOUT).await
    }

    /// Accept the next client, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::Timeout`] if no client connects in time, or the
    /// handshake error.
    pub async fn accept_within(&self, timeout: Duration) -> Result<MockSession, MockError> {
        let (stream, peer) = tokio::time::timeout(timeout, self.listener.accept())
            .await
            .map_err(|_| MockError::Timeout)??;
        let ws = accept_async(stream).await?;
        debug!(%peer, "Mock gateway accepted client");
        Ok(MockSession { ws })
    }

    /// Whether a client connects within `timeout`. The connection, if any,
    /// is dropped.
    pub async fn is_contacted_within(&self, timeout: Duration) -> bool {
        self.accept_within(timeout).await.is_ok()
    }
}

/// One accepted client connection.
#[derive(Debug)]
pub struct MockSession {
    ws: WebSocketStream<TcpStream>,
}

impl MockSession {
    /// Send a JSON value as a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket is closed.
    pub async fn send_json(&mut self, value: &Value) -> Result<(), MockError> {
        self.send_text(&value.to_string()).await
    }

    /// Send raw text, which need not be valid JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket is closed.
    pub async fn send_text(&mut self, text: &str) -> Result<(), MockError> {
        trace!(text, "Mock gateway sending");
        self.ws.send(Message::Text(text.to_string().into())).await?;
        Ok(())
    }

    /// Send a binary frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket is closed.
    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<(), MockError> {
        self.ws.send(Message::Binary(bytes.into())).await?;
        Ok(())
    }

    /// Next JSON text frame from the client, within `timeout`.
    ///
    /// # Errors
    ///
    /// [`MockError::Timeout`] if nothing arrives, or a socket error if the
    /// client went away.
    pub async fn recv_json_within(&mut self, timeout: Duration) -> Result<Value, MockError> {
        let deadline = tokio::time::Instant::now()
            .checked_add(timeout)
            .unwrap_or_else(tokio::time::Instant::now);
        loop {
            let next = tokio::time::timeout_at(deadline, self.ws.next())
                .await
                .map_err(|_| MockError::Timeout)?;
            match next {
                Some(Ok(Message::Text(text))) => {
                    trace!(text = text.as_str(), "Mock gateway received");
                    if let Ok(value) = serde_json::from_str::<Value>(text.as_str()) {
                        return Ok(value);
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    return Err(MockError::WebSocket(Box::new(
                        tungstenite::Error::ConnectionClosed,
                    )));
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Next JSON text frame from the client.
    ///
    /// # Errors
    ///
    /// See [`recv_json_within`](Self::recv_json_within).
    pub async fn recv_json(&mut self) -> Result<Value, MockError> {
        self.recv_json_within(DEFAULT_RECV_TIMEOUT).await
    }

    /// Next frame whose `op` equals `op`, skipping others.
    ///
    /// # Errors
    ///
    /// See [`recv_json_within`](Self::recv_json_within).
    pub async fn recv_op(&mut self, op: u64) -> Result<Value, MockError> {
        loop {
            let value = self.recv_json().await?;
            if value["op"].as_u64() == Some(op) {
                return Ok(value);
            }
        }
    }

    /// Every JSON frame received during `window`.
    pub async fn collect_frames(&mut self, window: Duration) -> Vec<Value> {
        let deadline = tokio::time::Instant::now()
            .checked_add(window)
            .unwrap_or_else(tokio::time::Instant::now);
        let mut frames = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return frames;
            }
            match self.recv_json_within(remaining).await {
                Ok(value) => frames.push(value),
                Err(_) => return frames,
            }
        }
    }

    /// Every frame with `op` received during `window`.
    pub async fn collect_op(&mut self, op: u64, window: Duration) -> Vec<Value> {
        self.collect_frames(window)
            .await
            .into_iter()
            .filter(|frame| frame["op"].as_u64() == Some(op))
            .collect()
    }

    /// Whether the client sends no frame with `op` during `window`.
    pub async fn is_silent_for(&mut self, op: u64, window: Duration) -> bool {
        self.collect_op(op, window).await.is_empty()
    }

    /// Whether the client closes the socket within `timeout`.
    pub async fn closed_within(&mut self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now()
            .checked_add(timeout)
            .unwrap_or_else(tokio::time::Instant::now);
        loop {
            match tokio::time::timeout_at(deadline, self.ws.next()).await {
                Err(_) => return false,
                Ok(Some(Ok(Message::Close(_)) | Err(_)) | None) => return true,
                Ok(Some(Ok(_))) => {},
            }
        }
    }

    /// Close the socket with `code`, as a server-side disconnect.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket is already closed.
    pub async fn close(&mut self, code: u16) -> Result<(), MockError> {
        let frame = CloseFrame {
            code: code.into(),
            reason: "mock gateway closing".into(),
        };
        self.ws.close(Some(frame)).await?;
        Ok(())
    }
}
