//! Connection state machine.
//!
//! [`transition`] is a pure function from the current state and an input
//! to the next state plus the ordered side effects the client actor must
//! carry out. It performs no I/O, which keeps every rule testable without
//! a socket.

use std::fmt;

/// Lifecycle of one gateway connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No socket.
    #[default]
    Disconnected,
    /// Socket is being opened.
    Connecting,
    /// Socket open, waiting for Hello.
    AwaitingHello,
    /// Identify sent, waiting for `READY`.
    Identifying,
    /// `READY` received.
    Connected,
    /// Closing the socket at the server's request.
    Terminating,
}

impl ConnectionState {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::AwaitingHello => "awaiting_hello",
            Self::Identifying => "identifying",
            Self::Connected => "connected",
            Self::Terminating => "terminating",
        }
    }

    /// Whether the heartbeat scheduler runs in this state.
    #[must_use]
    pub fn heartbeat_expected(self) -> bool {
        matches!(self, Self::Identifying | Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happened to the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Operator asked to connect.
    Connect,
    /// The socket finished opening.
    SocketOpened,
    /// `op=10` with the heartbeat interval.
    Hello {
        /// Interval in milliseconds.
        interval_ms: u64,
    },
    /// Dispatch `READY`.
    Ready,
    /// `op=7`.
    ReconnectRequested,
    /// `op=9`.
    InvalidSession,
    /// `op=1` from the server.
    HeartbeatRequested,
    /// `op=11`.
    HeartbeatAck,
    /// The heartbeat timer fired.
    HeartbeatTick,
    /// The socket errored, closed, or failed to open.
    SocketTerminated,
    /// Operator asked to disconnect.
    Disconnect,
    /// Any opcode the client does not handle.
    UnknownOp(u8),
}

/// Side effect requested by a transition, executed in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open a new socket to the gateway.
    OpenSocket,
    /// Close the socket and keep listening for its termination.
    CloseSocket,
    /// Close the socket and ignore anything it reports afterwards.
    DropSocket,
    /// Start (or restart) the heartbeat timer.
    StartHeartbeat {
        /// Interval in milliseconds.
        interval_ms: u64,
    },
    /// Stop the heartbeat timer.
    StopHeartbeat,
    /// Send Identify with the pending token.
    SendIdentify,
    /// Send a heartbeat with the current sequence number.
    SendHeartbeat,
    /// Clear the authenticated identity.
    ClearSession,
    /// Forget the pending token.
    ForgetToken,
    /// Tell observers about the new state.
    NotifyStatus,
    /// Ask the reconnect policy for a retry.
    ScheduleReconnect,
    /// Cancel a scheduled retry.
    CancelReconnect,
}

/// Result of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the input.
    pub next: ConnectionState,
    /// Effects to run, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: ConnectionState, effects: Vec<Effect>) -> Self {
        Self { next, effects }
    }

    /// Whether the transition includes `effect`.
    #[must_use]
    pub fn has(&self, effect: &Effect) -> bool {
        self.effects.contains(effect)
    }
}

/// Compute the transition for `input` in `state`.
///
/// Returns `None` when the input is not valid in the current state (a
/// second Hello, a `READY` outside the handshake, a termination while
/// already disconnected). The caller logs and ignores it.
#[must_use]
pub fn transition(state: ConnectionState, input: &Input) -> Option<Transition> {
    use ConnectionState as S;
    use Effect as E;

    let t = match (state, input) {
        (_, Input::Connect) => Transition::to(
            S::Connecting,
            vec![
                E::CancelReconnect,
                E::StopHeartbeat,
                E::ClearSession,
                E::DropSocket,
                E::NotifyStatus,
                E::OpenSocket,
            ],
        ),
        (_, Input::Disconnect) => Transition::to(
            S::Disconnected,
            vec![
                E::CancelReconnect,
                E::StopHeartbeat,
                E::ClearSession,
                E::ForgetToken,
                E::DropSocket,
                E::NotifyStatus,
            ],
        ),
        (S::Connecting, Input::SocketOpened) => {
            Transition::to(S::AwaitingHello, vec![E::NotifyStatus])
        },
        (S::AwaitingHello, Input::Hello { interval_ms }) => Transition::to(
            S::Identifying,
            vec![
                E::StartHeartbeat {
                    interval_ms: *interval_ms,
                },
                E::SendIdentify,
                E::NotifyStatus,
            ],
        ),
        (S::Identifying, Input::Ready) => Transition::to(S::Connected, vec![E::NotifyStatus]),
        (S::Identifying | S::Connected, Input::ReconnectRequested) => Transition::to(
            S::Terminating,
            vec![
                E::StopHeartbeat,
                E::ClearSession,
                E::NotifyStatus,
                E::CloseSocket,
            ],
        ),
        (S::Disconnected, Input::InvalidSession | Input::SocketTerminated) => return None,
        (_, Input::InvalidSession) => Transition::to(
            S::Disconnected,
            vec![
                E::StopHeartbeat,
                E::ClearSession,
                E::DropSocket,
                E::NotifyStatus,
            ],
        ),
        (_, Input::SocketTerminated) => Transition::to(
            S::Disconnected,
            vec![
                E::StopHeartbeat,
                E::ClearSession,
                E::NotifyStatus,
                E::ScheduleReconnect,
            ],
        ),
        (S::Identifying | S::Connected, Input::HeartbeatTick) | (_, Input::HeartbeatRequested) => {
            Transition::to(state, vec![E::SendHeartbeat])
        },
        (_, Input::HeartbeatAck | Input::UnknownOp(_)) => Transition::to(state, Vec::new()),
        (
            _,
            Input::SocketOpened
            | Input::Hello { .. }
            | Input::Ready
            | Input::ReconnectRequested
            | Input::HeartbeatTick,
        ) => return None,
    };
    Some(t)
}
