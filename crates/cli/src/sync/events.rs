// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed events and their fan-out to subscribers.
//!
//! Each client owns its own [`EventDispatcher`]; there is no global emitter.
//! Handlers run synchronously on the client's task, in registration order.

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use rts_core::protocol::{MiningUpdate, Notification, ServerError, SyncSnapshot, UserUpdate};

/// Event names a handler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connected,
    Disconnected,
    Heartbeat,
    DataSynced,
    LocalDataUpdated,
    MiningUpdate,
    UserUpdate,
    Notification,
    ConnectionError,
    ServerError,
    MaxReconnectAttemptsReached,
    Online,
    Offline,
}

impl EventKind {
    pub const ALL: [EventKind; 13] = [
        EventKind::Connected,
        EventKind::Disconnected,
        EventKind::Heartbeat,
        EventKind::DataSynced,
        EventKind::LocalDataUpdated,
        EventKind::MiningUpdate,
        EventKind::UserUpdate,
        EventKind::Notification,
        EventKind::ConnectionError,
        EventKind::ServerError,
        EventKind::MaxReconnectAttemptsReached,
        EventKind::Online,
        EventKind::Offline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Connected => "connected",
            EventKind::Disconnected => "disconnected",
            EventKind::Heartbeat => "heartbeat",
            EventKind::DataSynced => "dataSynced",
            EventKind::LocalDataUpdated => "localDataUpdated",
            EventKind::MiningUpdate => "miningUpdate",
            EventKind::UserUpdate => "userUpdate",
            EventKind::Notification => "notification",
            EventKind::ConnectionError => "connectionError",
            EventKind::ServerError => "serverError",
            EventKind::MaxReconnectAttemptsReached => "maxReconnectAttemptsReached",
            EventKind::Online => "online",
            EventKind::Offline => "offline",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown event name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event: '{0}'")]
pub struct UnknownEvent(pub String);

impl FromStr for EventKind {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

/// An event dispatched by the sync client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum SyncEvent {
    Connected {
        url: String,
        timestamp: i64,
    },
    Disconnected {
        code: Option<u16>,
        reason: String,
        timestamp: i64,
    },
    Heartbeat(Value),
    DataSynced(Value),
    LocalDataUpdated(SyncSnapshot),
    MiningUpdate {
        update: MiningUpdate,
        timestamp: i64,
    },
    UserUpdate {
        update: UserUpdate,
        timestamp: i64,
    },
    Notification {
        notification: Notification,
        timestamp: i64,
    },
    ConnectionError {
        error: String,
    },
    ServerError(ServerError),
    MaxReconnectAttemptsReached {
        attempts: u32,
    },
    Online,
    Offline,
}

impl SyncEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SyncEvent::Connected { .. } => EventKind::Connected,
            SyncEvent::Disconnected { .. } => EventKind::Disconnected,
            SyncEvent::Heartbeat(_) => EventKind::Heartbeat,
            SyncEvent::DataSynced(_) => EventKind::DataSynced,
            SyncEvent::LocalDataUpdated(_) => EventKind::LocalDataUpdated,
            SyncEvent::MiningUpdate { .. } => EventKind::MiningUpdate,
            SyncEvent::UserUpdate { .. } => EventKind::UserUpdate,
            SyncEvent::Notification { .. } => EventKind::Notification,
            SyncEvent::ConnectionError { .. } => EventKind::ConnectionError,
            SyncEvent::ServerError(_) => EventKind::ServerError,
            SyncEvent::MaxReconnectAttemptsReached { .. } => {
                EventKind::MaxReconnectAttemptsReached
            }
            SyncEvent::Online => EventKind::Online,
            SyncEvent::Offline => EventKind::Offline,
        }
    }
}

/// Error a handler may return; it is logged and otherwise ignored.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for event handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// Boxed event handler, as stored by the dispatcher.
pub type Handler = Box<dyn FnMut(&SyncEvent) -> HandlerResult + Send>;

/// Token identifying a registered handler, used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Fan-out of events to registered handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<EventKind, Vec<(SubscriptionId, Handler)>>,
    next_id: u64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `kind`. Handlers run in registration order.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&SyncEvent) -> HandlerResult + Send + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Unregister a handler. Returns false if it was not registered for `kind`.
    pub fn off(&mut self, kind: EventKind, id: SubscriptionId) -> bool {
        let Some(list) = self.handlers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(handler_id, _)| *handler_id != id);
        before != list.len()
    }

    /// Number of handlers registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Remove every handler.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Invoke every handler registered for the event's kind.
    ///
    /// A handler that fails or panics is logged; the remaining handlers still run.
    /// Returns the number of handlers that completed successfully.
    pub fn emit(&mut self, event: &SyncEvent) -> usize {
        let kind = event.kind();
        let Some(list) = self.handlers.get_mut(&kind) else {
            return 0;
        };

        let mut ok = 0;
        for (id, handler) in list.iter_mut() {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => ok += 1,
                Ok(Err(e)) => {
                    warn!(event = %kind, subscription = id.0, "event handler failed: {}", e);
                }
                Err(_) => {
                    warn!(event = %kind, subscription = id.0, "event handler panicked");
                }
            }
        }
        ok
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(kind, list)| (kind.as_str(), list.len()))
            .collect();
        f.debug_struct("EventDispatcher")
            .field("handlers", &counts)
            .finish()
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
