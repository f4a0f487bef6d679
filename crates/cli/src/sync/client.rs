// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync client for communicating with a real-time sync server.
//!
//! Provides a high-level interface for:
//! - Connecting to the remote server and recovering from drops
//! - Sending messages (with bounded offline queue fallback)
//! - Batching local changes into periodic `sync_data` messages
//! - Dispatching inbound messages and lifecycle changes as events
//!
//! The client is a single actor. Every state change happens on the task that
//! owns it, triggered by a transport frame, a timer deadline, or a call. Drive
//! it with [`SyncClient::turn`] or hand it to [`super::spawn`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use rts_core::id::now_ms;
use rts_core::{load_or_create_client_id, IdentityStore, Inbound, Message, SyncConfig};

use super::codec::{CodecError, MessageCodec};
use super::events::{EventDispatcher, EventKind, HandlerResult, SubscriptionId, SyncEvent};
use super::handle::{Command, SharedConnectionState};
use super::heartbeat::HeartbeatMonitor;
use super::pending::SyncScheduler;
use super::queue::OutboundQueue;
use super::reconnect::{ReconnectDecision, ReconnectionScheduler};
use super::transport::{
    CloseInfo, Dial, Incoming, Transport, TransportError, TransportResult, WebSocketTransport,
    CLOSE_NORMAL,
};
use super::validate::MessageValidator;

/// Close code sent when the client drops a connection it means to re-establish.
const CLOSE_GOING_AWAY: u16 = 1001;

/// Error type for sync client operations.
///
/// Transport and protocol failures never surface here; they become events.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Invalid configuration or identity store failure.
    #[error(transparent)]
    Core(#[from] rts_core::Error),

    /// The client task has stopped.
    #[error("sync client is no longer running")]
    ClientClosed,
}

/// Result type for sync client operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// State of the sync client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Not connected, and not trying to.
    Disconnected,
    /// Transport handshake in progress.
    Connecting,
    /// Connected to remote server.
    Connected,
    /// Waiting for the next reconnect attempt.
    Reconnecting,
    /// Reconnect attempts exhausted; needs an explicit `connect()`.
    Failed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
            ConnectionState::Failed => "failed",
        }
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
            ConnectionState::Reconnecting => 3,
            ConnectionState::Failed => 4,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            3 => ConnectionState::Reconnecting,
            4 => ConnectionState::Failed,
            _ => ConnectionState::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of the client, for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub connection_attempts: u32,
    pub last_sync_time: Option<i64>,
    pub offline_mode: bool,
    pub queued_messages: usize,
    pub pending_changes: usize,
}

/// What happened to a message handed to [`SyncClient::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Written to the transport.
    Sent,
    /// Held in the outbound queue until the next connection.
    Queued,
    /// Rejected by validation or encoding; will not be retried.
    Dropped,
}

/// Why a transmit attempt failed.
enum TransmitError {
    Codec(CodecError),
    Transport(TransportError),
}

/// What woke the actor up.
enum Wake<C> {
    Opened(TransportResult<C>),
    Incoming(TransportResult<Incoming>),
    Heartbeat,
    Sync,
    Reconnect,
}

/// Sync client for real-time communication.
pub struct SyncClient<T: Transport = WebSocketTransport> {
    config: SyncConfig,
    transport: T,
    client_id: String,
    state: ConnectionState,
    shared: Arc<SharedConnectionState>,
    validator: MessageValidator,
    codec: MessageCodec,
    queue: OutboundQueue,
    heartbeat: HeartbeatMonitor,
    sync: SyncScheduler,
    reconnect: ReconnectionScheduler,
    events: EventDispatcher,
    offline_mode: bool,
    /// Handshake in flight while `Connecting`.
    handshake: Option<Dial<T::Connection>>,
}

impl SyncClient<WebSocketTransport> {
    /// Create a new sync client with default WebSocket transport.
    pub fn new(config: SyncConfig, identity: &dyn IdentityStore) -> SyncResult<Self> {
        Self::with_transport(config, WebSocketTransport::new(), identity)
    }
}

impl<T: Transport> SyncClient<T> {
    /// Create a new sync client with a custom transport.
    ///
    /// Fails only on invalid configuration or an unusable identity store.
    pub fn with_transport(
        config: SyncConfig,
        transport: T,
        identity: &dyn IdentityStore,
    ) -> SyncResult<Self> {
        config.validate()?;
        let client_id = load_or_create_client_id(identity)?;

        Ok(SyncClient {
            validator: MessageValidator::from_config(&config),
            codec: MessageCodec::from_config(&config),
            queue: OutboundQueue::new(config.max_queue_size),
            heartbeat: HeartbeatMonitor::new(config.heartbeat_interval()),
            sync: SyncScheduler::new(config.sync_interval()),
            reconnect: ReconnectionScheduler::from_config(&config),
            events: EventDispatcher::new(),
            shared: Arc::new(SharedConnectionState::new()),
            state: ConnectionState::Disconnected,
            offline_mode: false,
            handshake: None,
            client_id,
            transport,
            config,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Get the current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected && self.transport.is_connected()
    }

    /// Lock-free state shared with [`super::SyncHandle`]s.
    pub fn shared_state(&self) -> Arc<SharedConnectionState> {
        Arc::clone(&self.shared)
    }

    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus {
            state: self.state,
            connection_attempts: self.reconnect.attempt(),
            last_sync_time: self.heartbeat.last_sync_time(),
            offline_mode: self.offline_mode,
            queued_messages: self.queue.len(),
            pending_changes: self.sync.pending().len(),
        }
    }

    /// Number of messages waiting in the outbound queue.
    pub fn queued_messages(&self) -> usize {
        self.queue.len()
    }

    /// Number of keys waiting for the next sync flush.
    pub fn pending_changes(&self) -> usize {
        self.sync.pending().len()
    }

    /// Whether a reconnect attempt is currently armed.
    pub fn reconnect_armed(&self) -> bool {
        self.reconnect.is_armed()
    }

    /// Whether the heartbeat and sync timers are running.
    pub fn timers_running(&self) -> bool {
        self.heartbeat.is_running() || self.sync.is_running()
    }

    /// Register an event handler.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&SyncEvent) -> HandlerResult + Send + 'static,
    {
        self.events.on(kind, handler)
    }

    /// Unregister an event handler.
    pub fn off(&mut self, kind: EventKind, id: SubscriptionId) -> bool {
        self.events.off(kind, id)
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "connection state changed");
        }
        self.state = state;
        self.shared.set(state);
        self.shared.set_attempt(self.reconnect.attempt());
        self.shared.set_queued(self.queue.len());
    }

    fn emit(&mut self, event: SyncEvent) {
        debug!(event = %event.kind(), "dispatching event");
        self.events.emit(&event);
    }

    /// Connect to the remote server and wait for the handshake to finish.
    ///
    /// A no-op while connected or connecting. Called from `Disconnected` or
    /// `Failed` it starts a fresh attempt budget. Failures are reported as
    /// `connectionError` events and handed to the reconnect schedule.
    ///
    /// A client running under [`SyncClient::run`] only starts the handshake
    /// and keeps serving commands until it completes.
    pub async fn connect(&mut self) {
        self.start_connect();
        self.finish_handshake().await;
    }

    fn start_connect(&mut self) {
        match self.state {
            ConnectionState::Connected | ConnectionState::Connecting => {
                debug!(state = %self.state, "connect ignored");
                return;
            }
            ConnectionState::Disconnected | ConnectionState::Failed => self.reconnect.reset(),
            ConnectionState::Reconnecting => self.reconnect.cancel(),
        }
        self.begin_open();
    }

    /// Enter `Connecting` and start a handshake bounded by the connect timeout.
    fn begin_open(&mut self) {
        self.set_state(ConnectionState::Connecting);
        info!(
            url = %self.config.server_url,
            attempt = self.reconnect.attempt(),
            "connecting"
        );

        let dial = self.transport.dial(&self.config.server_url);
        let limit = self.config.connect_timeout();
        let limit_ms = self.config.connect_timeout_ms;
        let handshake: Dial<T::Connection> = Box::pin(async move {
            match tokio::time::timeout(limit, dial).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout(limit_ms)),
            }
        });
        self.handshake = Some(handshake);
    }

    /// Drive a pending handshake to completion.
    async fn finish_handshake(&mut self) {
        if let Some(handshake) = self.handshake.take() {
            let result = handshake.await;
            self.opened(result).await;
        }
    }

    async fn opened(&mut self, result: TransportResult<T::Connection>) {
        match result {
            Ok(connection) => {
                self.transport.attach(connection);
                self.on_open().await;
            }
            Err(e) => {
                warn!("connection attempt failed: {}", e);
                self.emit(SyncEvent::ConnectionError {
                    error: e.to_string(),
                });
                self.schedule_reconnect();
            }
        }
    }

    async fn on_open(&mut self) {
        self.reconnect.reset();
        self.set_state(ConnectionState::Connected);
        info!(url = %self.config.server_url, "connected");

        self.heartbeat.start();
        self.sync.start();

        let drained = self.drain_queue().await;

        self.emit(SyncEvent::Connected {
            url: self.config.server_url.clone(),
            timestamp: now_ms(),
        });

        if let Err(e) = drained {
            self.emit(SyncEvent::ConnectionError {
                error: e.to_string(),
            });
            self.connection_lost(CloseInfo::new(None, e.to_string()));
        }
    }

    fn schedule_reconnect(&mut self) {
        match self.reconnect.schedule_next() {
            ReconnectDecision::Scheduled { attempt, delay } => {
                info!(
                    "reconnecting in {}ms (attempt {}/{})",
                    delay.as_millis(),
                    attempt,
                    self.config.max_reconnect_attempts
                );
                self.set_state(ConnectionState::Reconnecting);
            }
            ReconnectDecision::Exhausted { attempts } => {
                warn!("giving up after {} reconnect attempts", attempts);
                self.set_state(ConnectionState::Failed);
                self.emit(SyncEvent::MaxReconnectAttemptsReached { attempts });
            }
        }
    }

    fn stop_timers(&mut self) {
        self.heartbeat.stop();
        self.sync.stop();
    }

    /// Handle an unintentional loss of a live connection.
    fn connection_lost(&mut self, info: CloseInfo) {
        self.stop_timers();
        warn!(code = ?info.code, reason = %info.reason, "connection lost");
        self.set_state(ConnectionState::Reconnecting);
        self.emit(SyncEvent::Disconnected {
            code: info.code,
            reason: info.reason,
            timestamp: now_ms(),
        });
        self.schedule_reconnect();
    }

    /// Disconnect from the remote server.
    ///
    /// Intentional disconnects close with code 1000, cancel every timer and
    /// leave the client `Disconnected`; calling it again changes nothing.
    /// Unintentional disconnects drop a live connection and go through the
    /// normal reconnect schedule. Neither clears the queue or pending changes.
    pub async fn disconnect(&mut self, intentional: bool) {
        if !intentional {
            if self.state != ConnectionState::Connected {
                debug!(state = %self.state, "unintentional disconnect ignored");
                return;
            }
            if let Err(e) = self
                .transport
                .disconnect(CLOSE_GOING_AWAY, "connection reset by client")
                .await
            {
                debug!("error closing transport: {}", e);
            }
            self.connection_lost(CloseInfo::new(
                Some(CLOSE_GOING_AWAY),
                "connection reset by client",
            ));
            return;
        }

        self.reconnect.cancel();
        self.stop_timers();
        if self.handshake.take().is_some() {
            debug!("abandoning handshake in progress");
        }

        let was_live = self.state == ConnectionState::Connected || self.transport.is_connected();
        if was_live {
            if let Err(e) = self
                .transport
                .disconnect(CLOSE_NORMAL, "client disconnecting")
                .await
            {
                debug!("error closing transport: {}", e);
            }
        }

        if self.state == ConnectionState::Disconnected && !was_live {
            return;
        }
        self.set_state(ConnectionState::Disconnected);
        info!("disconnected from server");

        if was_live {
            self.emit(SyncEvent::Disconnected {
                code: Some(CLOSE_NORMAL),
                reason: "client disconnecting".to_string(),
                timestamp: now_ms(),
            });
        }
    }

    async fn transmit(&mut self, msg: &Message) -> Result<(), TransmitError> {
        let frame = self.codec.encode(msg).map_err(TransmitError::Codec)?;
        self.transport
            .send(frame)
            .await
            .map_err(TransmitError::Transport)
    }

    fn enqueue(&mut self, msg: Message) {
        self.queue.push(msg);
        self.shared.set_queued(self.queue.len());
    }

    /// Send a message, or queue it when not connected.
    ///
    /// Invalid messages are dropped and logged. A transport failure re-queues
    /// the message, raises `connectionError` and starts reconnecting.
    pub async fn send(&mut self, msg: Message) -> SendOutcome {
        if let Err(e) = self.validator.validate(&msg) {
            warn!(id = %msg.id, "dropping invalid message: {}", e);
            return SendOutcome::Dropped;
        }

        if self.state != ConnectionState::Connected {
            debug!(id = %msg.id, kind = %msg.kind, state = %self.state, "queueing message");
            self.enqueue(msg);
            return SendOutcome::Queued;
        }

        match self.transmit(&msg).await {
            Ok(()) => {
                debug!(id = %msg.id, kind = %msg.kind, "message sent");
                SendOutcome::Sent
            }
            Err(TransmitError::Codec(e)) => {
                warn!(id = %msg.id, "dropping message that failed to encode: {}", e);
                SendOutcome::Dropped
            }
            Err(TransmitError::Transport(e)) => {
                warn!(id = %msg.id, "send failed, queueing message: {}", e);
                self.enqueue(msg);
                self.emit(SyncEvent::ConnectionError {
                    error: e.to_string(),
                });
                self.connection_lost(CloseInfo::new(None, e.to_string()));
                SendOutcome::Queued
            }
        }
    }

    /// Send every queued message in enqueue order.
    ///
    /// On a transport failure the failed message and everything after it go
    /// back to the front of the queue and the error is returned.
    async fn drain_queue(&mut self) -> TransportResult<usize> {
        if self.queue.is_empty() {
            return Ok(0);
        }

        let entries = self.queue.drain();
        info!("draining {} queued messages", entries.len());

        let mut sent = 0;
        let mut remaining = entries.into_iter();
        while let Some(entry) = remaining.next() {
            match self.transmit(&entry.message).await {
                Ok(()) => sent += 1,
                Err(TransmitError::Codec(e)) => {
                    warn!(id = %entry.message.id, "dropping queued message that failed to encode: {}", e);
                }
                Err(TransmitError::Transport(e)) => {
                    let mut unsent = vec![entry];
                    unsent.extend(remaining);
                    warn!(
                        "drain stopped after {} messages, {} re-queued: {}",
                        sent,
                        unsent.len(),
                        e
                    );
                    self.queue.restore_front(unsent);
                    self.shared.set_queued(self.queue.len());
                    return Err(e);
                }
            }
        }

        self.shared.set_queued(self.queue.len());
        Ok(sent)
    }

    /// Record a local change for the next sync flush (last write wins).
    pub fn record_change(&mut self, key: impl Into<String>, value: Value) {
        self.sync.record_change(key, value);
    }

    /// Flush pending changes now as one `sync_data` message.
    ///
    /// The pending set is cleared as soon as the message is handed to `send`.
    /// Returns `None` when nothing was pending.
    pub async fn flush_pending(&mut self) -> Option<SendOutcome> {
        let msg = self.sync.take_batch(&self.client_id)?;
        debug!(id = %msg.id, "flushing pending changes");
        Some(self.send(msg).await)
    }

    /// React to the host's network availability changing.
    ///
    /// Going offline only flags the client and emits `offline`. Coming back
    /// online emits `online`, then drains the queue if connected, or connects.
    pub async fn set_online(&mut self, online: bool) {
        self.go_online(online).await;
        self.finish_handshake().await;
    }

    async fn go_online(&mut self, online: bool) {
        if !online {
            self.offline_mode = true;
            self.emit(SyncEvent::Offline);
            return;
        }

        self.offline_mode = false;
        self.emit(SyncEvent::Online);
        if self.state == ConnectionState::Connected {
            if let Err(e) = self.drain_queue().await {
                self.emit(SyncEvent::ConnectionError {
                    error: e.to_string(),
                });
                self.connection_lost(CloseInfo::new(None, e.to_string()));
            }
        } else {
            self.start_connect();
        }
    }

    /// Tear the client down: disconnect, then drop handlers, queue and
    /// pending changes.
    pub async fn shutdown(&mut self) {
        self.disconnect(true).await;
        self.events.clear();
        self.queue.clear();
        self.sync.clear();
        self.shared.set_queued(0);
        info!("sync client shut down");
    }

    async fn next_wake(&mut self) -> Wake<T::Connection> {
        let connected = self.state == ConnectionState::Connected;
        tokio::select! {
            opened = wait_handshake(&mut self.handshake) => Wake::Opened(opened),
            incoming = self.transport.recv(), if connected => Wake::Incoming(incoming),
            _ = self.heartbeat.timer().wait() => Wake::Heartbeat,
            _ = self.sync.timer().wait() => Wake::Sync,
            _ = self.reconnect.timer().wait() => Wake::Reconnect,
        }
    }

    /// Wait for the next frame or timer deadline and handle it, including
    /// any handshake a reconnect timer starts.
    ///
    /// Never resolves while disconnected with no timer armed.
    pub async fn turn(&mut self) {
        let wake = self.next_wake().await;
        self.handle_wake(wake).await;
        self.finish_handshake().await;
    }

    async fn handle_wake(&mut self, wake: Wake<T::Connection>) {
        match wake {
            Wake::Opened(result) => {
                self.handshake = None;
                self.opened(result).await;
            }
            Wake::Incoming(Ok(Incoming::Text(text))) => self.handle_frame(&text),
            Wake::Incoming(Ok(Incoming::Closed(info))) => self.handle_close(info),
            Wake::Incoming(Err(e)) => {
                warn!("receive failed: {}", e);
                self.emit(SyncEvent::ConnectionError {
                    error: e.to_string(),
                });
                self.connection_lost(CloseInfo::new(None, e.to_string()));
            }
            Wake::Heartbeat => {
                let msg = self.heartbeat.tick(&self.client_id);
                self.send(msg).await;
            }
            Wake::Sync => {
                self.sync.tick();
                self.flush_pending().await;
            }
            Wake::Reconnect => {
                self.reconnect.fire();
                self.begin_open();
            }
        }
    }

    fn handle_close(&mut self, info: CloseInfo) {
        if !info.is_normal() {
            self.connection_lost(info);
            return;
        }
        self.stop_timers();
        info!(reason = %info.reason, "server closed the connection");
        self.set_state(ConnectionState::Disconnected);
        self.emit(SyncEvent::Disconnected {
            code: info.code,
            reason: info.reason,
            timestamp: now_ms(),
        });
    }

    fn handle_frame(&mut self, text: &str) {
        let msg = match self.codec.decode(text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("dropping undecodable frame: {}", e);
                return;
            }
        };
        if let Err(e) = self.validator.validate(&msg) {
            warn!(id = %msg.id, "dropping invalid inbound message: {}", e);
            return;
        }
        match Inbound::from_message(msg) {
            Ok(inbound) => self.dispatch_inbound(inbound),
            Err(e) => warn!("dropping inbound message: {}", e),
        }
    }

    fn dispatch_inbound(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Heartbeat(data) => {
                self.heartbeat.record_remote();
                self.emit(SyncEvent::Heartbeat(data));
            }
            Inbound::SyncData { raw, snapshot } => {
                match snapshot {
                    Some(snapshot) => self.emit(SyncEvent::LocalDataUpdated(snapshot)),
                    None => debug!("sync_data payload has no usable snapshot"),
                }
                self.emit(SyncEvent::DataSynced(raw));
            }
            Inbound::MiningUpdate(update) => self.emit(SyncEvent::MiningUpdate {
                update,
                timestamp: now_ms(),
            }),
            Inbound::UserUpdate(update) => self.emit(SyncEvent::UserUpdate {
                update,
                timestamp: now_ms(),
            }),
            Inbound::Notification(notification) => self.emit(SyncEvent::Notification {
                notification,
                timestamp: now_ms(),
            }),
            Inbound::Error(err) => {
                error!(code = ?err.code, "server error: {}", err.message);
                self.emit(SyncEvent::ServerError(err));
            }
            Inbound::Unknown { kind } => {
                warn!("ignoring message of unknown type '{}'", kind);
            }
        }
    }

    /// Apply a command received through a [`super::SyncHandle`].
    pub(crate) async fn apply(&mut self, command: Command) {
        match command {
            Command::Connect => self.start_connect(),
            Command::Disconnect { intentional } => self.disconnect(intentional).await,
            Command::Send(msg) => {
                self.send(msg).await;
            }
            Command::RecordChange { key, value } => self.record_change(key, value),
            Command::FlushPending => {
                self.flush_pending().await;
            }
            Command::SetOnline(online) => self.go_online(online).await,
            Command::Subscribe {
                kind,
                handler,
                reply,
            } => {
                let id = self.events.on(kind, handler);
                let _ = reply.send(id);
            }
            Command::Unsubscribe { kind, id, reply } => {
                let _ = reply.send(self.events.off(kind, id));
            }
            Command::Status(reply) => {
                let _ = reply.send(self.status());
            }
            Command::Shutdown => self.shutdown().await,
        }
    }

    /// Run the actor until shutdown, cancellation, or every handle is dropped.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>, cancel: CancellationToken) {
        loop {
            // Ready frames, timers and handshakes go ahead of queued commands
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.shutdown().await;
                    break;
                }
                wake = self.next_wake() => self.handle_wake(wake).await,
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => {
                        self.shutdown().await;
                        break;
                    }
                    Some(command) => self.apply(command).await,
                },
            }
        }
    }
}

/// Resolves with the handshake result; never resolves when none is running.
async fn wait_handshake<C: Send + 'static>(handshake: &mut Option<Dial<C>>) -> TransportResult<C> {
    match handshake {
        Some(dial) => dial.as_mut().await,
        None => std::future::pending().await,
    }
}

impl<T: Transport> fmt::Debug for SyncClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncClient")
            .field("url", &self.config.server_url)
            .field("client_id", &self.client_id)
            .field("state", &self.state)
            .field("queued", &self.queue.len())
            .field("pending", &self.sync.pending().len())
            .finish()
    }
}
