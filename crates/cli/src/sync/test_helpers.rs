// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use rts_core::{MemoryIdentityStore, Message, SyncConfig};
use serde_json::json;

use super::client::SyncClient;
use super::events::{EventKind, SyncEvent};
use super::transport_tests::{MockRemote, MockTransport};

pub const TEST_CLIENT_ID: &str = "client_test";

/// Create a test message whose id is `msg-{n}`.
pub fn make_test_message(n: u32) -> Message {
    let mut msg = Message::new("test", json!({ "n": n }));
    msg.id = format!("msg-{}", n);
    msg
}

/// Config with short, distinct timer intervals.
pub fn test_config() -> SyncConfig {
    SyncConfig {
        heartbeat_interval_ms: 30_000,
        sync_interval_ms: 5_000,
        base_reconnect_delay_ms: 1_000,
        max_reconnect_delay_ms: 30_000,
        max_reconnect_attempts: 3,
        max_queue_size: 10,
        ..SyncConfig::with_url("ws://mock.test/sync")
    }
}

/// Build a client over a mock transport with a fixed client id.
pub fn make_client(config: SyncConfig) -> (SyncClient<MockTransport>, MockRemote) {
    let (transport, remote) = MockTransport::new();
    let identity = MemoryIdentityStore::with_id(TEST_CLIENT_ID);
    let client = SyncClient::with_transport(config, transport, &identity).unwrap();
    (client, remote)
}

/// Record every event the client dispatches.
pub fn record_events<T: super::transport::Transport>(
    client: &mut SyncClient<T>,
) -> Arc<Mutex<Vec<SyncEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    for kind in EventKind::ALL {
        let log = Arc::clone(&log);
        client.on(kind, move |event| {
            log.lock().unwrap().push(event.clone());
            Ok(())
        });
    }
    log
}

/// Kinds of the recorded events, in dispatch order.
pub fn kinds(log: &Arc<Mutex<Vec<SyncEvent>>>) -> Vec<EventKind> {
    log.lock().unwrap().iter().map(SyncEvent::kind).collect()
}
