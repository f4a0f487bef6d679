// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the event dispatcher.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use std::sync::{Arc, Mutex};
use yare::parameterized;

fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&'static str) -> Handler) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_clone = Arc::clone(&log);
    let make = move |name: &'static str| -> Handler {
        let log = Arc::clone(&log_clone);
        Box::new(move |_event: &SyncEvent| {
            log.lock().unwrap().push(name.to_string());
            Ok(())
        })
    };
    (log, make)
}

#[test]
fn handlers_run_in_registration_order() {
    let mut dispatcher = EventDispatcher::new();
    let (log, make) = recorder();

    dispatcher.on(EventKind::Online, make("first"));
    dispatcher.on(EventKind::Online, make("second"));
    dispatcher.on(EventKind::Offline, make("other"));

    assert_eq!(dispatcher.emit(&SyncEvent::Online), 2);
    assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn off_removes_only_that_handler() {
    let mut dispatcher = EventDispatcher::new();
    let (log, make) = recorder();

    let first = dispatcher.on(EventKind::Online, make("first"));
    dispatcher.on(EventKind::Online, make("second"));

    assert!(dispatcher.off(EventKind::Online, first));
    assert!(!dispatcher.off(EventKind::Online, first));
    assert!(!dispatcher.off(EventKind::Offline, first));
    assert_eq!(dispatcher.listener_count(EventKind::Online), 1);

    dispatcher.emit(&SyncEvent::Online);
    assert_eq!(*log.lock().unwrap(), vec!["second"]);
}

#[test]
fn failing_handler_does_not_stop_others() {
    let mut dispatcher = EventDispatcher::new();
    let (log, make) = recorder();

    dispatcher.on(EventKind::Offline, |_| Err("boom".into()));
    dispatcher.on(EventKind::Offline, |_| panic!("handler bug"));
    dispatcher.on(EventKind::Offline, make("survivor"));

    assert_eq!(dispatcher.emit(&SyncEvent::Offline), 1);
    assert_eq!(*log.lock().unwrap(), vec!["survivor"]);
}

#[test]
fn emit_without_handlers_is_noop() {
    let mut dispatcher = EventDispatcher::new();
    assert_eq!(dispatcher.emit(&SyncEvent::Online), 0);
}

#[test]
fn clear_removes_everything() {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.on(EventKind::Online, |_| Ok(()));
    dispatcher.on(EventKind::Offline, |_| Ok(()));
    dispatcher.clear();
    assert_eq!(dispatcher.listener_count(EventKind::Online), 0);
    assert_eq!(dispatcher.listener_count(EventKind::Offline), 0);
}

#[test]
fn handler_receives_payload() {
    let mut dispatcher = EventDispatcher::new();
    let seen = Arc::new(Mutex::new(None));
    let seen_clone = Arc::clone(&seen);
    dispatcher.on(EventKind::Heartbeat, move |event| {
        *seen_clone.lock().unwrap() = Some(event.clone());
        Ok(())
    });

    dispatcher.emit(&SyncEvent::Heartbeat(json!({ "server_time": 5 })));
    assert_eq!(
        *seen.lock().unwrap(),
        Some(SyncEvent::Heartbeat(json!({ "server_time": 5 })))
    );
}

#[parameterized(
    connected = { EventKind::Connected, "connected" },
    data_synced = { EventKind::DataSynced, "dataSynced" },
    max_reconnect = { EventKind::MaxReconnectAttemptsReached, "maxReconnectAttemptsReached" },
    connection_error = { EventKind::ConnectionError, "connectionError" },
)]
fn event_names_round_trip(kind: EventKind, name: &str) {
    assert_eq!(kind.as_str(), name);
    assert_eq!(name.parse::<EventKind>().unwrap(), kind);
}

#[test]
fn unknown_event_name_is_rejected() {
    let err = "reconnected".parse::<EventKind>().unwrap_err();
    assert_eq!(err, UnknownEvent("reconnected".into()));
}

#[test]
fn every_kind_has_a_distinct_name() {
    let names: std::collections::HashSet<&str> =
        EventKind::ALL.iter().map(EventKind::as_str).collect();
    assert_eq!(names.len(), EventKind::ALL.len());
}

#[test]
fn event_serializes_with_event_name() {
    let event = SyncEvent::MaxReconnectAttemptsReached { attempts: 10 };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "maxReconnectAttemptsReached");
    assert_eq!(value["payload"]["attempts"], 10);
    assert_eq!(event.kind(), EventKind::MaxReconnectAttemptsReached);
}
