//! `WebSocket` connection management for the gateway.
//!
//! Opens the socket and runs the two per-connection tasks: a writer that
//! drains an outbound queue and a reader that forwards text frames. The
//! reader folds errors, close frames, and end of stream into a single
//! [`SocketEvent::Terminated`].

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace, warn};

use crate::error::GatewayError;
use crate::protocol::{self, GatewayPayload};

/// Type alias for the `WebSocket` stream.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Close code for a normal, client-initiated close.
pub(crate) const NORMAL_CLOSE: u16 = 1000;

/// Capacity of the outbound queue feeding the writer task.
pub(crate) const OUTBOUND_CAPACITY: usize = 64;

/// Something the reader task observed.
#[derive(Debug)]
pub(crate) enum SocketEvent {
    /// A text frame.
    Frame(String),
    /// The socket is gone. `code` is set when the peer sent a close frame.
    Terminated {
        code: Option<u16>,
        reason: String,
    },
}

/// A message for the writer task.
#[derive(Debug)]
pub(crate) enum Outbound {
    /// Serialize and send a payload.
    Payload(GatewayPayload),
    /// Send a close frame and stop.
    Close(u16),
}

/// A freshly opened `WebSocket` connection.
pub(crate) struct GatewayConnection {
    /// Write half of the `WebSocket`.
    writer: SplitSink<WsStream, Message>,
    /// Read half of the `WebSocket`.
    reader: SplitStream<WsStream>,
}

impl std::fmt::Debug for GatewayConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConnection").finish_non_exhaustive()
    }
}

impl GatewayConnection {
    /// Connect to the given gateway endpoint (`ws://` or `wss://`).
    pub(crate) async fn connect(url: &str) -> Result<Self, GatewayError> {
        let (ws, _response) = connect_async(url).await?;
        let (writer, reader) = ws.split();
        Ok(Self { writer, reader })
    }

    /// Spawn the writer and reader tasks.
    ///
    /// `on_event` receives everything the reader sees; returning `false`
    /// stops the reader. The reader always ends with one `Terminated`.
    pub(crate) fn spawn<F>(self, on_event: F) -> LiveSocket
    where
        F: Fn(SocketEvent) -> bool + Send + 'static,
    {
        let (outbound_tx, outbound_rx) = mpsc::channel::<Outbound>(OUTBOUND_CAPACITY);
        let writer = tokio::spawn(run_writer(self.writer, outbound_rx));
        let reader = tokio::spawn(run_reader(self.reader, on_event));
        LiveSocket {
            outbound: outbound_tx,
            writer,
            reader,
        }
    }
}

/// Handles to the tasks of an open socket.
#[derive(Debug)]
pub(crate) struct LiveSocket {
    outbound: mpsc::Sender<Outbound>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl LiveSocket {
    /// Queue a payload for the writer.
    pub(crate) fn send(&self, payload: GatewayPayload) -> Result<(), GatewayError> {
        self.outbound
            .try_send(Outbound::Payload(payload))
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => {
                    GatewayError::Connection("outbound queue full".to_string())
                },
                mpsc::error::TrySendError::Closed(_) => GatewayError::NotConnected,
            })
    }

    /// Whether the writer can still accept payloads.
    pub(crate) fn is_open(&self) -> bool {
        !self.outbound.is_closed() && !self.writer.is_finished()
    }

    /// Ask the peer to close. The reader keeps running and reports the
    /// termination.
    pub(crate) fn close(&self, code: u16) {
        if self.outbound.try_send(Outbound::Close(code)).is_err() {
            debug!("Writer already gone, close frame not queued");
        }
    }

    /// Close and stop reading. Nothing more is reported for this socket.
    pub(crate) fn detach(self, code: u16) {
        self.reader.abort();
        self.close(code);
        // Dropping the sender lets the writer finish after the close frame.
    }
}

impl Drop for LiveSocket {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn run_writer(mut writer: SplitSink<WsStream, Message>, mut rx: mpsc::Receiver<Outbound>) {
    while let Some(outbound) = rx.recv().await {
        match outbound {
            Outbound::Payload(payload) => {
                let json = match protocol::encode(&payload) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!(error = %e, "Failed to serialize Gateway payload");
                        continue;
                    },
                };
                trace!(op = payload.op, "Sending gateway payload");
                if let Err(e) = writer.send(Message::Text(json.into())).await {
                    debug!(error = %e, "WebSocket write failed");
                    break;
                }
            },
            Outbound::Close(code) => {
                let frame = CloseFrame {
                    code: code.into(),
                    reason: "closing".into(),
                };
                if let Err(e) = writer.send(Message::Close(Some(frame))).await {
                    debug!(error = %e, "Failed to send close frame");
                }
                break;
            },
        }
    }
}

async fn run_reader<F>(mut reader: SplitStream<WsStream>, on_event: F)
where
    F: Fn(SocketEvent) -> bool + Send + 'static,
{
    let terminated = loop {
        match reader.next().await {
            Some(Ok(Message::Text(text))) => {
                if !on_event(SocketEvent::Frame(text.as_str().to_string())) {
                    return;
                }
            },
            Some(Ok(Message::Close(frame))) => {
                let (code, reason) = frame.as_ref().map_or((None, String::new()), |f| {
                    (Some(u16::from(f.code)), f.reason.as_str().to_string())
                });
                break SocketEvent::Terminated { code, reason };
            },
            Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_) | Message::Frame(_))) => {
                // Ping/pong handled by tungstenite; binary skipped.
            },
            Some(Err(e)) => {
                break SocketEvent::Terminated {
                    code: None,
                    reason: e.to_string(),
                };
            },
            None => {
                break SocketEvent::Terminated {
                    code: None,
                    reason: "stream ended".to_string(),
                };
            },
        }
    };
    on_event(terminated);
}
