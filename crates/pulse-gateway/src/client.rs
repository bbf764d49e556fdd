//! Gateway client: the public handle and the actor behind it.
//!
//! Every [`GatewayClient`] owns one actor task. The actor is the only code
//! that touches connection state; the socket reader, socket writer,
//! heartbeat timer, reconnect timer, and connect attempt all run as
//! separate tasks that post messages into the actor's inbox. Messages are
//! tagged with the connection epoch they belong to, and anything from an
//! earlier epoch is dropped on arrival.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::config::GatewayConfig;
use crate::connection::{GatewayConnection, LiveSocket, NORMAL_CLOSE, SocketEvent};
use crate::error::{GatewayError, GatewayResult};
use crate::events::{GatewayEvent, Notifier, Severity};
use crate::heartbeat::HeartbeatScheduler;
use crate::machine::{self, ConnectionState, Effect, Input, Transition};
use crate::presence::{Activity, ActivityKind, Presence};
use crate::protocol::{self, GatewayPayload, HelloPayload, opcode};
use crate::reconnect::ReconnectTimer;
use crate::router::{self, Dispatch};
use crate::session::{SessionIdentity, SessionState};

/// Point-in-time view of a client, for front-ends and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Connection state.
    pub state: ConnectionState,
    /// Authenticated identity (only while connected).
    pub identity: Option<SessionIdentity>,
    /// Session id from the last `READY`.
    pub session_id: Option<String>,
    /// Last presence reported by the gateway.
    pub presence: Option<Presence>,
    /// Activity currently shown.
    pub current_activity: Option<Activity>,
    /// Sequence number the next heartbeat carries.
    pub sequence: Option<u64>,
    /// Whether the heartbeat timer is running.
    pub heartbeat_active: bool,
    /// Whether a reconnect attempt is scheduled.
    pub reconnect_pending: bool,
    /// Whether a token is held for reconnecting.
    pub has_token: bool,
}

/// Operator commands, each answered on a oneshot.
enum Command {
    Connect {
        token: String,
        reply: oneshot::Sender<GatewayResult<()>>,
    },
    Disconnect {
        reply: oneshot::Sender<()>,
    },
    SubmitActivity {
        activity: Option<Activity>,
        reply: oneshot::Sender<GatewayResult<()>>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Messages from the actor's helper tasks.
#[derive(Debug)]
enum Inbox {
    Opened {
        epoch: u64,
        connection: GatewayConnection,
    },
    Socket {
        epoch: u64,
        event: SocketEvent,
    },
    HeartbeatDue {
        epoch: u64,
    },
    ReconnectDue {
        ticket: u64,
    },
}

/// Handle to a running gateway client.
///
/// Cloning the handle shares the same client. The client stops when
/// [`shutdown`](Self::shutdown) is called or every handle is dropped.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    commands: mpsc::UnboundedSender<Command>,
    notifier: Notifier,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Connect { .. } => "Connect",
            Self::Disconnect { .. } => "Disconnect",
            Self::SubmitActivity { .. } => "SubmitActivity",
            Self::Snapshot { .. } => "Snapshot",
            Self::Shutdown { .. } => "Shutdown",
        };
        f.write_str(name)
    }
}

impl GatewayClient {
    /// Spawn a client on the current tokio runtime. It starts disconnected.
    #[must_use]
    pub fn spawn(config: GatewayConfig) -> Self {
        let notifier = Notifier::new(config.event_capacity);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let actor = Actor::new(config, notifier.clone(), inbox_tx);
        tokio::spawn(actor.run(command_rx, inbox_rx));

        Self {
            commands: command_tx,
            notifier,
        }
    }

    /// Receive every notification published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.notifier.subscribe()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> GatewayResult<T> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(make(reply))
            .map_err(|_| GatewayError::Shutdown)?;
        rx.await.map_err(|_| GatewayError::Shutdown)
    }

    /// Open a connection authenticated with `token`.
    ///
    /// Returns once the attempt has started; progress is reported through
    /// [`subscribe`](Self::subscribe). Any existing socket is closed first.
    ///
    /// # Errors
    ///
    /// [`GatewayError::MissingToken`] for a blank token, or
    /// [`GatewayError::Shutdown`] if the client has stopped.
    pub async fn connect(&self, token: impl Into<String>) -> GatewayResult<()> {
        let token = token.into();
        self.request(|reply| Command::Connect { token, reply })
            .await?
    }

    /// Close the connection, stop heartbeats, cancel any pending reconnect,
    /// and forget the token.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Shutdown`] if the client has stopped.
    pub async fn disconnect(&self) -> GatewayResult<()> {
        self.request(|reply| Command::Disconnect { reply }).await
    }

    /// Replace our activity, or clear it with `None`.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotConnected`] unless connected,
    /// [`GatewayError::InvalidActivity`] for a blank name.
    pub async fn submit_activity(&self, activity: Option<Activity>) -> GatewayResult<()> {
        self.request(|reply| Command::SubmitActivity { activity, reply })
            .await?
    }

    /// Show an activity built from operator input. Inputs are trimmed and
    /// blank `details`/`state` are dropped.
    ///
    /// # Errors
    ///
    /// Same as [`submit_activity`](Self::submit_activity).
    pub async fn set_activity(
        &self,
        kind: ActivityKind,
        name: &str,
        details: Option<&str>,
        state: Option<&str>,
    ) -> GatewayResult<()> {
        let mut activity = Activity::new(kind, name.trim());
        if let Some(details) = details {
            activity = activity.with_details(details);
        }
        if let Some(state) = state {
            activity = activity.with_state(state);
        }
        self.submit_activity(Some(activity)).await
    }

    /// Clear our activity.
    ///
    /// # Errors
    ///
    /// Same as [`submit_activity`](Self::submit_activity).
    pub async fn clear_activity(&self) -> GatewayResult<()> {
        self.submit_activity(None).await
    }

    /// Current state of the client.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Shutdown`] if the client has stopped.
    pub async fn snapshot(&self) -> GatewayResult<Snapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Close everything and stop the actor. Other handles see
    /// [`GatewayError::Shutdown`] afterwards.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Shutdown`] if the client had already stopped.
    pub async fn shutdown(&self) -> GatewayResult<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }
}

// ── Actor ────────────────────────────────────────────────────

/// What the actor loop does after handling a command.
enum LoopAction {
    Continue,
    Stop,
}

struct Actor {
    config: GatewayConfig,
    endpoint: String,
    state: ConnectionState,
    session: SessionState,
    pending_token: Option<String>,
    /// Bumped whenever a socket is opened, dropped, or terminates.
    epoch: u64,
    connecting: Option<JoinHandle<()>>,
    socket: Option<LiveSocket>,
    close_watchdog: Option<JoinHandle<()>>,
    heartbeat: HeartbeatScheduler,
    reconnect: ReconnectTimer,
    notifier: Notifier,
    inbox: mpsc::UnboundedSender<Inbox>,
}

impl Actor {
    fn new(config: GatewayConfig, notifier: Notifier, inbox: mpsc::UnboundedSender<Inbox>) -> Self {
        Self {
            endpoint: config.endpoint(),
            config,
            state: ConnectionState::Disconnected,
            session: SessionState::new(),
            pending_token: None,
            epoch: 0,
            connecting: None,
            socket: None,
            close_watchdog: None,
            heartbeat: HeartbeatScheduler::new(),
            reconnect: ReconnectTimer::default(),
            notifier,
            inbox,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut inbox: mpsc::UnboundedReceiver<Inbox>,
    ) {
        debug!(endpoint = %self.endpoint, "Gateway client started");
        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        // Every handle dropped.
                        self.teardown();
                        break;
                    };
                    if let LoopAction::Stop = self.handle_command(command) {
                        break;
                    }
                },
                Some(message) = inbox.recv() => self.handle_inbox(message),
            }
        }
    }

    fn teardown(&mut self) {
        self.heartbeat.stop();
        self.reconnect.cancel();
        self.drop_socket();
        debug!("Gateway client stopped");
    }

    // ── Commands ─────────────────────────────────────────────

    fn handle_command(&mut self, command: Command) -> LoopAction {
        trace!(?command, "Gateway command");
        match command {
            Command::Connect { token, reply } => {
                let _ = reply.send(self.connect(&token));
            },
            Command::Disconnect { reply } => {
                self.disconnect();
                let _ = reply.send(());
            },
            Command::SubmitActivity { activity, reply } => {
                let _ = reply.send(self.submit_activity(activity));
            },
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            },
            Command::Shutdown { reply } => {
                self.teardown();
                let _ = reply.send(());
                return LoopAction::Stop;
            },
        }
        LoopAction::Continue
    }

    fn connect(&mut self, token: &str) -> GatewayResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(GatewayError::MissingToken);
        }
        self.pending_token = Some(token.to_string());
        self.step(&Input::Connect);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.notifier.log(Severity::Info, "disconnecting");
        self.step(&Input::Disconnect);
    }

    fn submit_activity(&mut self, activity: Option<Activity>) -> GatewayResult<()> {
        let socket = match (&self.socket, self.state) {
            (Some(socket), ConnectionState::Connected) if socket.is_open() => socket,
            _ => return Err(GatewayError::NotConnected),
        };

        let activity = activity.map(Activity::normalized);
        if let Some(activity) = &activity {
            activity.validate()?;
        }

        socket.send(protocol::build_presence_update(activity.as_ref())?)?;

        match &activity {
            Some(activity) => {
                self.notifier
                    .log(Severity::Success, format!("activity set: {activity}"));
            },
            None => self.notifier.log(Severity::Success, "activity cleared"),
        }
        self.session.record_local_activity(activity);
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            identity: self.session.identity().cloned(),
            session_id: self.session.session_id().map(str::to_string),
            presence: self.session.presence().cloned(),
            current_activity: self.session.current_activity().cloned(),
            sequence: self.session.sequence(),
            heartbeat_active: self.heartbeat.is_active(),
            reconnect_pending: self.reconnect.is_pending(),
            has_token: self.pending_token.is_some(),
        }
    }

    // ── State machine ────────────────────────────────────────

    /// Compute the transition for `input`, logging if it is ignored.
    fn accept(&self, input: &Input) -> Option<Transition> {
        let transition = machine::transition(self.state, input);
        if transition.is_none() {
            match input {
                Input::HeartbeatTick | Input::SocketTerminated => {
                    trace!(state = %self.state, ?input, "Input ignored");
                },
                _ => {
                    warn!(state = %self.state, ?input, "Unexpected gateway input ignored");
                    self.notifier.log(
                        Severity::Warn,
                        format!("ignored {input:?} while {}", self.state),
                    );
                },
            }
        }
        transition
    }

    fn apply(&mut self, transition: Transition) {
        if transition.next != self.state {
            debug!(from = %self.state, to = %transition.next, "Connection state changed");
        }
        self.state = transition.next;
        for effect in transition.effects {
            self.run_effect(effect);
        }
    }

    fn step(&mut self, input: &Input) -> bool {
        match self.accept(input) {
            Some(transition) => {
                self.apply(transition);
                true
            },
            None => false,
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::OpenSocket => self.open_socket(),
            Effect::CloseSocket => self.close_socket(),
            Effect::DropSocket => self.drop_socket(),
            Effect::StartHeartbeat { interval_ms } => self.start_heartbeat(interval_ms),
            Effect::StopHeartbeat => self.heartbeat.stop(),
            Effect::SendIdentify => self.send_identify(),
            Effect::SendHeartbeat => self.send_heartbeat(),
            Effect::ClearSession => self.session.clear_session(),
            Effect::ForgetToken => self.pending_token = None,
            Effect::NotifyStatus => {
                self.notifier.publish(GatewayEvent::StatusChanged(self.state));
            },
            Effect::ScheduleReconnect => self.schedule_reconnect(),
            Effect::CancelReconnect => self.reconnect.cancel(),
        }
    }

    // ── Effects ──────────────────────────────────────────────

    fn next_epoch(&mut self) -> u64 {
        self.epoch = self.epoch.wrapping_add(1);
        self.epoch
    }

    fn open_socket(&mut self) {
        let epoch = self.next_epoch();
        let url = self.endpoint.clone();
        let inbox = self.inbox.clone();

        info!(url = %url, epoch, "Connecting to gateway");
        self.notifier
            .publish(GatewayEvent::log(Severity::Info, "connecting to gateway"));

        self.connecting = Some(tokio::spawn(async move {
            let message = match GatewayConnection::connect(&url).await {
                Ok(connection) => Inbox::Opened { epoch, connection },
                Err(e) => Inbox::Socket {
                    epoch,
                    event: SocketEvent::Terminated {
                        code: None,
                        reason: e.to_string(),
                    },
                },
            };
            let _ = inbox.send(message);
        }));
    }

    /// Close deliberately; the termination still arrives and is handled.
    fn close_socket(&mut self) {
        let Some(socket) = &self.socket else {
            return;
        };
        socket.close(NORMAL_CLOSE);

        let epoch = self.epoch;
        let grace = self.config.close_grace;
        let inbox = self.inbox.clone();
        self.close_watchdog = Some(tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let _ = inbox.send(Inbox::Socket {
                epoch,
                event: SocketEvent::Terminated {
                    code: None,
                    reason: "close handshake timed out".to_string(),
                },
            });
        }));
    }

    /// Close and forget; nothing from the old socket is handled again.
    fn drop_socket(&mut self) {
        if let Some(task) = self.connecting.take() {
            task.abort();
        }
        if let Some(task) = self.close_watchdog.take() {
            task.abort();
        }
        if let Some(socket) = self.socket.take() {
            socket.detach(NORMAL_CLOSE);
            debug!(epoch = self.epoch, "Socket detached");
        }
        self.next_epoch();
    }

    fn start_heartbeat(&mut self, interval_ms: u64) {
        let epoch = self.epoch;
        let inbox = self.inbox.clone();
        self.heartbeat
            .start(Duration::from_millis(interval_ms), move || {
                inbox.send(Inbox::HeartbeatDue { epoch }).is_ok()
            });
    }

    fn send(&self, payload: GatewayPayload) -> bool {
        let Some(socket) = &self.socket else {
            trace!(op = payload.op, "No socket, payload dropped");
            return false;
        };
        match socket.send(payload) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "Failed to queue payload");
                false
            },
        }
    }

    fn send_identify(&mut self) {
        let Some(token) = self.pending_token.as_deref() else {
            warn!("Identify requested without a token");
            return;
        };
        let payload = protocol::build_identify(
            token,
            self.config.effective_intents(),
            &self.config.properties,
        );
        if self.send(payload) {
            self.notifier.log(Severity::Info, "identify sent");
        }
    }

    fn send_heartbeat(&mut self) {
        let sequence = self.session.sequence();
        if self.send(protocol::build_heartbeat(sequence)) {
            trace!(?sequence, "Heartbeat sent");
        }
    }

    fn schedule_reconnect(&mut self) {
        let Some(delay) = self
            .config
            .reconnect
            .next_attempt(self.pending_token.as_deref())
        else {
            debug!("No reconnect scheduled");
            return;
        };
        let inbox = self.inbox.clone();
        self.reconnect.schedule(delay, move |ticket| {
            let _ = inbox.send(Inbox::ReconnectDue { ticket });
        });
        self.notifier.log(
            Severity::Info,
            format!("reconnecting in {} ms", delay.as_millis()),
        );
    }

    // ── Inbox ────────────────────────────────────────────────

    fn handle_inbox(&mut self, message: Inbox) {
        match message {
            Inbox::Opened { epoch, connection } => {
                if epoch != self.epoch {
                    debug!(epoch, current = self.epoch, "Discarding stale connection");
                    return;
                }
                self.on_opened(connection);
            },
            Inbox::Socket { epoch, event } => {
                if epoch != self.epoch {
                    trace!(epoch, current = self.epoch, "Discarding stale socket event");
                    return;
                }
                match event {
                    SocketEvent::Frame(text) => self.on_frame(&text),
                    SocketEvent::Terminated { code, reason } => self.on_terminated(code, &reason),
                }
            },
            Inbox::HeartbeatDue { epoch } => {
                if epoch == self.epoch {
                    self.step(&Input::HeartbeatTick);
                }
            },
            Inbox::ReconnectDue { ticket } => self.on_reconnect_due(ticket),
        }
    }

    fn on_opened(&mut self, connection: GatewayConnection) {
        self.connecting = None;
        let epoch = self.epoch;
        let inbox = self.inbox.clone();
        self.socket = Some(connection.spawn(move |event| {
            inbox.send(Inbox::Socket { epoch, event }).is_ok()
        }));
        self.notifier.log(Severity::Info, "socket opened");
        self.step(&Input::SocketOpened);
    }

    fn on_terminated(&mut self, code: Option<u16>, reason: &str) {
        self.connecting = None;
        if let Some(task) = self.close_watchdog.take() {
            task.abort();
        }
        self.socket = None;
        self.next_epoch();

        let message = match code {
            Some(code) => format!("connection closed (code {code})"),
            None if reason.is_empty() => "connection closed".to_string(),
            None => format!("connection closed: {reason}"),
        };
        self.notifier.log(Severity::Warn, message);
        self.step(&Input::SocketTerminated);
    }

    fn on_reconnect_due(&mut self, ticket: u64) {
        if !self.reconnect.claim(ticket) {
            trace!(ticket, "Stale reconnect timer");
            return;
        }
        let Some(token) = self.pending_token.clone() else {
            return;
        };
        self.notifier.log(Severity::Info, "reconnecting");
        if let Err(e) = self.connect(&token) {
            warn!(error = %e, "Reconnect attempt rejected");
        }
    }

    fn on_frame(&mut self, text: &str) {
        let payload = match protocol::decode(text) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to parse gateway frame");
                self.notifier
                    .log(Severity::Warn, format!("ignored malformed frame: {e}"));
                return;
            },
        };

        self.session.observe_sequence(payload.s);

        match payload.op {
            opcode::DISPATCH => self.on_dispatch(&payload),
            opcode::HELLO => match payload.data::<HelloPayload>() {
                Ok(hello) => {
                    self.notifier.log(
                        Severity::Info,
                        format!("hello received, heartbeat every {} ms", hello.heartbeat_interval),
                    );
                    self.step(&Input::Hello {
                        interval_ms: hello.heartbeat_interval,
                    });
                },
                Err(e) => {
                    warn!(error = %e, "Malformed Hello payload");
                    self.notifier
                        .log(Severity::Warn, format!("ignored malformed hello: {e}"));
                },
            },
            opcode::HEARTBEAT => {
                debug!("Gateway requested immediate heartbeat");
                self.step(&Input::HeartbeatRequested);
            },
            opcode::HEARTBEAT_ACK => {
                trace!("Heartbeat ACK received");
                self.step(&Input::HeartbeatAck);
            },
            opcode::RECONNECT => {
                self.notifier
                    .log(Severity::Warn, "gateway requested a reconnect");
                self.step(&Input::ReconnectRequested);
            },
            opcode::INVALID_SESSION => {
                self.notifier.log(
                    Severity::Error,
                    format!("{}; check the token", GatewayError::InvalidSession),
                );
                self.step(&Input::InvalidSession);
            },
            other => {
                debug!(op = other, "Unknown gateway opcode");
                self.notifier
                    .log(Severity::Info, format!("unknown op code: {other}"));
                self.step(&Input::UnknownOp(other));
            },
        }
    }

    fn on_dispatch(&mut self, payload: &GatewayPayload) {
        match router::route(payload) {
            Ok(Dispatch::Ready(ready)) => {
                let Some(transition) = self.accept(&Input::Ready) else {
                    return;
                };
                let events = router::apply_ready(&mut self.session, ready);
                info!(
                    session_id = self.session.session_id().unwrap_or_default(),
                    "Gateway session established (READY)"
                );
                self.apply(transition);
                self.notifier.publish_all(events);
            },
            Ok(Dispatch::PresenceUpdate(update)) => {
                let events = router::apply_presence_update(&mut self.session, update);
                self.notifier.publish_all(events);
            },
            Ok(Dispatch::Ignored(_)) => {},
            Err(e) => {
                warn!(event = ?payload.t, error = %e, "Failed to decode dispatch event");
                self.notifier.log(
                    Severity::Warn,
                    format!(
                        "ignored malformed {} event: {e}",
                        payload.t.as_deref().unwrap_or("dispatch")
                    ),
                );
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> GatewayConfig {
        // Port 9 (discard) on loopback is closed in test environments.
        GatewayConfig {
            reconnect: crate::reconnect::ReconnectPolicy::disabled(),
            ..GatewayConfig::with_url("ws://127.0.0.1:9")
        }
    }

    #[tokio::test]
    async fn starts_disconnected() {
        let client = GatewayClient::spawn(GatewayConfig::default());
        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.state, ConnectionState::Disconnected);
        assert!(snapshot.identity.is_none());
        assert!(!snapshot.heartbeat_active);
        assert!(!snapshot.has_token);
    }

    #[tokio::test]
    async fn connect_rejects_blank_token() {
        let client = GatewayClient::spawn(GatewayConfig::default());
        let err = client.connect("   ").await.unwrap_err();
        assert!(matches!(err, GatewayError::MissingToken));
        assert_eq!(
            client.snapshot().await.unwrap().state,
            ConnectionState::Disconnected
        );
    }

    #[tokio::test]
    async fn activity_requires_connection() {
        let client = GatewayClient::spawn(GatewayConfig::default());
        let err = client.clear_activity().await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConnected));

        let err = client
            .set_activity(ActivityKind::Playing, "Chess", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotConnected));
    }

    #[tokio::test]
    async fn failed_connect_terminates_to_disconnected() {
        let client = GatewayClient::spawn(unreachable_config());
        let mut events = client.subscribe();
        client.connect("token").await.unwrap();

        let mut states = Vec::new();
        while let Ok(Ok(event)) =
            tokio::time::timeout(Duration::from_secs(5), events.recv()).await
        {
            if let GatewayEvent::StatusChanged(state) = event {
                states.push(state);
                if state == ConnectionState::Disconnected {
                    break;
                }
            }
        }
        assert_eq!(
            states,
            vec![ConnectionState::Connecting, ConnectionState::Disconnected]
        );

        let snapshot = client.snapshot().await.unwrap();
        assert!(snapshot.has_token);
        assert!(!snapshot.reconnect_pending);
    }

    #[tokio::test]
    async fn disconnect_forgets_token() {
        let client = GatewayClient::spawn(unreachable_config());
        client.connect("token").await.unwrap();
        client.disconnect().await.unwrap();

        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.state, ConnectionState::Disconnected);
        assert!(!snapshot.has_token);
        assert!(!snapshot.reconnect_pending);
    }

    #[tokio::test]
    async fn shutdown_stops_the_actor() {
        let client = GatewayClient::spawn(GatewayConfig::default());
        let other = client.clone();
        client.shutdown().await.unwrap();
        assert!(matches!(
            other.snapshot().await.unwrap_err(),
            GatewayError::Shutdown
        ));
    }
}
