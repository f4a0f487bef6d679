// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Batched local changes and the timer that flushes them.
//!
//! Changes are recorded per key with last-write-wins semantics. Every sync
//! interval the scheduler turns the whole set into a single `sync_data`
//! message and clears it, whether or not the server ever acknowledges it.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use rts_core::id::now_ms;
use rts_core::protocol::ChangeRecord;
use rts_core::Message;

use super::timer::Timer;

/// Last-write-wins map of changes not yet flushed.
#[derive(Debug, Default, Clone)]
pub struct PendingChangeSet {
    changes: HashMap<String, ChangeRecord>,
}

impl PendingChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change, replacing any earlier value for the same key.
    pub fn record(&mut self, key: impl Into<String>, value: Value) {
        self.changes.insert(
            key.into(),
            ChangeRecord {
                value,
                timestamp: now_ms(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&ChangeRecord> {
        self.changes.get(key)
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Remove and return every change. Order across keys is unspecified.
    pub fn take_all(&mut self) -> Vec<(String, ChangeRecord)> {
        self.changes.drain().collect()
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }
}

/// Periodic flush of the pending change set.
#[derive(Debug)]
pub struct SyncScheduler {
    interval: Duration,
    timer: Timer,
    pending: PendingChangeSet,
}

impl SyncScheduler {
    pub fn new(interval: Duration) -> Self {
        SyncScheduler {
            interval,
            timer: Timer::new(),
            pending: PendingChangeSet::new(),
        }
    }

    pub fn start(&mut self) {
        self.timer.arm_every(self.interval);
    }

    pub fn stop(&mut self) {
        self.timer.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Acknowledge a timer tick.
    pub fn tick(&mut self) {
        self.timer.fire();
    }

    pub fn pending(&self) -> &PendingChangeSet {
        &self.pending
    }

    pub fn record_change(&mut self, key: impl Into<String>, value: Value) {
        self.pending.record(key, value);
    }

    /// Build the batched `sync_data` message and clear the set.
    ///
    /// Returns `None` when nothing is pending.
    pub fn take_batch(&mut self, client_id: &str) -> Option<Message> {
        if self.pending.is_empty() {
            return None;
        }
        Some(Message::sync_data(client_id, self.pending.take_all()))
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
