// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cloneable handle to a [`SyncClient`] running on its own task.
//!
//! The handle forwards calls over a channel to the actor, so handlers and
//! other tasks never touch client state directly. Connection state is also
//! mirrored into atomics for lock-free reads.

use std::sync::atomic::{AtomicU32, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use rts_core::Message;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::client::{ConnectionState, ConnectionStatus, SyncClient, SyncError, SyncResult};
use super::events::{EventKind, Handler, HandlerResult, SubscriptionId, SyncEvent};
use super::transport::Transport;

/// Depth of the command channel between handles and the actor.
const COMMAND_BUFFER: usize = 256;

/// Connection state visible to both the client task and its handles.
///
/// Uses atomic fields for lock-free reads.
pub struct SharedConnectionState {
    /// Current state (atomic for lock-free reads).
    state: AtomicU8,
    /// Reconnect attempt count (for status reporting).
    attempt: AtomicU32,
    /// Messages waiting in the outbound queue.
    queued: AtomicUsize,
}

impl SharedConnectionState {
    /// Create a new shared state initialized to disconnected.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::Disconnected.to_u8()),
            attempt: AtomicU32::new(0),
            queued: AtomicUsize::new(0),
        }
    }

    /// Get the current state.
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Set the state.
    pub fn set(&self, state: ConnectionState) {
        self.state.store(state.to_u8(), Ordering::Release);
    }

    /// Get the current attempt count.
    pub fn attempt(&self) -> u32 {
        self.attempt.load(Ordering::Acquire)
    }

    /// Set the attempt count.
    pub fn set_attempt(&self, attempt: u32) {
        self.attempt.store(attempt, Ordering::Release);
    }

    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Acquire)
    }

    pub fn set_queued(&self, queued: usize) {
        self.queued.store(queued, Ordering::Release);
    }

    /// Check if currently connected.
    pub fn is_connected(&self) -> bool {
        self.get() == ConnectionState::Connected
    }

    /// Get a human-readable status string.
    pub fn status_string(&self) -> String {
        match self.get() {
            ConnectionState::Reconnecting => {
                format!("reconnecting (attempt {})", self.attempt())
            }
            ConnectionState::Failed => {
                format!("failed after {} attempts", self.attempt())
            }
            state => state.as_str().to_string(),
        }
    }
}

impl Default for SharedConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Requests sent from a [`SyncHandle`] to the client task.
pub enum Command {
    Connect,
    Disconnect {
        intentional: bool,
    },
    Send(Message),
    RecordChange {
        key: String,
        value: Value,
    },
    FlushPending,
    SetOnline(bool),
    Subscribe {
        kind: EventKind,
        handler: Handler,
        reply: oneshot::Sender<SubscriptionId>,
    },
    Unsubscribe {
        kind: EventKind,
        id: SubscriptionId,
        reply: oneshot::Sender<bool>,
    },
    Status(oneshot::Sender<ConnectionStatus>),
    Shutdown,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect => f.write_str("Connect"),
            Self::Disconnect { intentional } => f
                .debug_struct("Disconnect")
                .field("intentional", intentional)
                .finish(),
            Self::Send(msg) => f.debug_tuple("Send").field(&msg.id).finish(),
            Self::RecordChange { key, .. } => {
                f.debug_struct("RecordChange").field("key", key).finish()
            }
            Self::FlushPending => f.write_str("FlushPending"),
            Self::SetOnline(online) => f.debug_tuple("SetOnline").field(online).finish(),
            Self::Subscribe { kind, .. } => f
                .debug_struct("Subscribe")
                .field("kind", kind)
                .field("handler", &"<handler>")
                .finish(),
            Self::Unsubscribe { kind, id, .. } => f
                .debug_struct("Unsubscribe")
                .field("kind", kind)
                .field("id", id)
                .finish(),
            Self::Status(_) => f.write_str("Status"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Cloneable handle to a running sync client.
#[derive(Clone)]
pub struct SyncHandle {
    commands: mpsc::Sender<Command>,
    shared: Arc<SharedConnectionState>,
    cancel: CancellationToken,
}

/// Start the client's actor loop on a new task.
pub fn spawn<T>(client: SyncClient<T>) -> (SyncHandle, JoinHandle<()>)
where
    T: Transport + 'static,
{
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let cancel = CancellationToken::new();
    let handle = SyncHandle {
        commands: tx,
        shared: client.shared_state(),
        cancel: cancel.clone(),
    };
    let task = tokio::spawn(client.run(rx, cancel));
    (handle, task)
}

impl SyncHandle {
    async fn request(&self, command: Command) -> SyncResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SyncError::ClientClosed)
    }

    pub async fn connect(&self) -> SyncResult<()> {
        self.request(Command::Connect).await
    }

    pub async fn disconnect(&self, intentional: bool) -> SyncResult<()> {
        self.request(Command::Disconnect { intentional }).await
    }

    /// Send a message, or queue it when not connected.
    pub async fn send(&self, msg: Message) -> SyncResult<()> {
        self.request(Command::Send(msg)).await
    }

    pub async fn record_change(&self, key: impl Into<String>, value: Value) -> SyncResult<()> {
        self.request(Command::RecordChange {
            key: key.into(),
            value,
        })
        .await
    }

    pub async fn flush_pending(&self) -> SyncResult<()> {
        self.request(Command::FlushPending).await
    }

    pub async fn set_online(&self, online: bool) -> SyncResult<()> {
        self.request(Command::SetOnline(online)).await
    }

    /// Register an event handler on the running client.
    pub async fn on<F>(&self, kind: EventKind, handler: F) -> SyncResult<SubscriptionId>
    where
        F: FnMut(&SyncEvent) -> HandlerResult + Send + 'static,
    {
        let (reply, rx) = oneshot::channel();
        self.request(Command::Subscribe {
            kind,
            handler: Box::new(handler),
            reply,
        })
        .await?;
        rx.await.map_err(|_| SyncError::ClientClosed)
    }

    pub async fn off(&self, kind: EventKind, id: SubscriptionId) -> SyncResult<bool> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::Unsubscribe { kind, id, reply })
            .await?;
        rx.await.map_err(|_| SyncError::ClientClosed)
    }

    /// Full status snapshot, answered by the client task.
    pub async fn status(&self) -> SyncResult<ConnectionStatus> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::Status(reply)).await?;
        rx.await.map_err(|_| SyncError::ClientClosed)
    }

    /// Current connection state, without a round trip.
    pub fn connection_state(&self) -> ConnectionState {
        self.shared.get()
    }

    pub fn shared_state(&self) -> &SharedConnectionState {
        &self.shared
    }

    /// Ask the client to shut down; returns once the request is delivered.
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.request(Command::Shutdown).await
    }

    /// Stop the client without waiting for queued commands.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

impl std::fmt::Debug for SyncHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncHandle")
            .field("state", &self.shared.get())
            .field("closed", &self.commands.is_closed())
            .finish()
    }
}
