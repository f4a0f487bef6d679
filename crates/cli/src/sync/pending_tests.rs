// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for pending changes and the sync scheduler.

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;

#[test]
fn last_write_wins() {
    let mut pending = PendingChangeSet::new();
    pending.record("x", json!(1));
    pending.record("x", json!(2));

    assert_eq!(pending.len(), 1);
    assert_eq!(pending.get("x").unwrap().value, json!(2));
}

#[test]
fn take_all_empties_the_set() {
    let mut pending = PendingChangeSet::new();
    pending.record("a", json!("one"));
    pending.record("b", json!("two"));

    let mut taken = pending.take_all();
    taken.sort_by(|a, b| a.0.cmp(&b.0));

    assert_eq!(taken.len(), 2);
    assert_eq!(taken[0].0, "a");
    assert_eq!(taken[1].1.value, json!("two"));
    assert!(pending.is_empty());
}

#[test]
fn batch_contains_only_latest_value_per_key() {
    let mut scheduler = SyncScheduler::new(Duration::from_secs(5));
    scheduler.record_change("x", json!(1));
    scheduler.record_change("x", json!(2));
    scheduler.record_change("y", json!({ "nested": true }));

    let msg = scheduler.take_batch("client_1").unwrap();
    assert_eq!(msg.kind, "sync_data");

    let data = msg.data.unwrap();
    let changes = data["changes"].as_array().unwrap();
    assert_eq!(changes.len(), 2);

    let x = changes.iter().find(|pair| pair[0] == "x").unwrap();
    assert_eq!(x[1]["value"], 2);
    assert_eq!(data["client_id"], "client_1");
    assert!(scheduler.pending().is_empty());
}

#[test]
fn empty_set_produces_no_batch() {
    let mut scheduler = SyncScheduler::new(Duration::from_secs(5));
    assert!(scheduler.take_batch("client_1").is_none());
}

#[tokio::test(start_paused = true)]
async fn start_and_stop_arm_the_timer() {
    let mut scheduler = SyncScheduler::new(Duration::from_millis(20));
    assert!(!scheduler.is_running());

    scheduler.start();
    assert!(scheduler.is_running());
    scheduler.timer().wait().await;
    scheduler.tick();
    assert!(scheduler.is_running());

    scheduler.stop();
    assert!(!scheduler.is_running());
}

#[test]
fn stop_keeps_pending_changes() {
    let mut scheduler = SyncScheduler::new(Duration::from_millis(20));
    scheduler.record_change("k", json!(true));
    scheduler.stop();
    assert_eq!(scheduler.pending().len(), 1);
}
