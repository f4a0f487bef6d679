// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Holds the latest value per key for thread-safe access, plus the broadcast
//! channel that fans messages out to every connection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use rts_core::{ChangeRecord, Message};

/// Identifies one accepted connection.
pub type ConnectionId = u64;

/// A message fanned out to every connection except its origin.
#[derive(Debug, Clone)]
pub struct Broadcast {
    pub origin: ConnectionId,
    pub message: Message,
}

/// Shared server state containing the latest value per key.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    /// Latest change per key (last write wins by timestamp).
    values: RwLock<HashMap<String, ChangeRecord>>,
    /// Broadcast channel for relaying messages to clients.
    broadcast_tx: broadcast::Sender<Broadcast>,
    /// Source of connection ids.
    next_connection: AtomicU64,
}

impl ServerState {
    pub fn new() -> Self {
        // Create broadcast channel with reasonable buffer
        let (broadcast_tx, _) = broadcast::channel(1024);

        ServerState {
            inner: Arc::new(ServerStateInner {
                values: RwLock::new(HashMap::new()),
                broadcast_tx,
                next_connection: AtomicU64::new(1),
            }),
        }
    }

    /// Allocates an id for a new connection.
    pub fn register_connection(&self) -> ConnectionId {
        self.inner.next_connection.fetch_add(1, Ordering::Relaxed)
    }

    /// Applies changes, keeping the newer record for each key.
    ///
    /// A change replaces the stored record when its timestamp is not older.
    /// Returns the changes that were applied.
    pub async fn apply_changes(
        &self,
        changes: Vec<(String, ChangeRecord)>,
    ) -> Vec<(String, ChangeRecord)> {
        let mut values = self.inner.values.write().await;
        let mut applied = Vec::new();
        for (key, change) in changes {
            let newer = match values.get(&key) {
                Some(current) => change.timestamp >= current.timestamp,
                None => true,
            };
            if newer {
                values.insert(key.clone(), change.clone());
                applied.push((key, change));
            }
        }
        applied
    }

    /// Returns the stored record for a key.
    #[cfg(test)]
    pub async fn get(&self, key: &str) -> Option<ChangeRecord> {
        self.inner.values.read().await.get(key).cloned()
    }

    /// Returns every stored value, keyed by name.
    pub async fn snapshot(&self) -> HashMap<String, ChangeRecord> {
        self.inner.values.read().await.clone()
    }

    /// Relays a message to every connection except `origin`.
    pub fn broadcast(&self, origin: ConnectionId, message: Message) {
        // No receivers is not an error
        let _ = self.inner.broadcast_tx.send(Broadcast { origin, message });
    }

    /// Subscribe to broadcast messages.
    pub fn subscribe(&self) -> broadcast::Receiver<Broadcast> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Number of live subscriptions (one per open connection).
    pub fn connection_count(&self) -> usize {
        self.inner.broadcast_tx.receiver_count()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
