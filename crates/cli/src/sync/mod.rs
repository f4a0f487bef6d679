// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Real-time sync client.
//!
//! Keeps a persistent WebSocket connection to a sync server, keeps it alive
//! with heartbeats, batches local changes, and surfaces everything that
//! happens as typed events.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ SyncHandle  │────►│ SyncClient  │────►│  Transport  │◄───► server
//! │ (commands)  │     │   (actor)   │◄────│   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                       │    │    │
//!          ┌────────────┘    │    └────────────┐
//!          ▼                 ▼                 ▼
//!   ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//!   │   Timers    │   │   Queue /   │   │   Events    │
//!   │ (heartbeat, │   │   Pending   │   │ (dispatcher)│
//!   │ sync, retry)│   │             │   │             │
//!   └─────────────┘   └─────────────┘   └─────────────┘
//! ```
//!
//! # Features
//!
//! - Exponential backoff reconnects with a bounded attempt budget
//! - Bounded drop-oldest queue for messages sent while disconnected
//! - Last-write-wins batching of local changes into `sync_data`
//! - Size validation and compression marking of outbound messages
//! - Injectable transport trait for testing

mod client;
mod codec;
mod events;
mod handle;
mod heartbeat;
mod pending;
mod queue;
mod reconnect;
mod timer;
mod transport;
mod validate;

pub use client::{
    ConnectionState, ConnectionStatus, SendOutcome, SyncClient, SyncError, SyncResult,
};
pub use codec::{CodecError, MessageCodec};
pub use events::{
    EventDispatcher, EventKind, HandlerError, HandlerResult, SubscriptionId, SyncEvent,
    UnknownEvent,
};
pub use handle::{spawn, SharedConnectionState, SyncHandle};
pub use heartbeat::HeartbeatMonitor;
pub use pending::{PendingChangeSet, SyncScheduler};
pub use queue::{OutboundQueue, QueueEntry};
pub use reconnect::{ReconnectDecision, ReconnectionScheduler};
pub use timer::Timer;
pub use transport::{
    CloseInfo, Dial, Incoming, Transport, TransportError, TransportResult, WebSocketTransport,
    WsStream, CLOSE_NORMAL,
};
pub use validate::{MessageValidator, ValidationError};

#[cfg(test)]
mod test_helpers;



#[cfg(test)]
mod integration_tests;
