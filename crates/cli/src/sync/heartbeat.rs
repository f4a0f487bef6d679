// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness pings and last-seen tracking.
//!
//! The monitor only proves liveness to the remote side. It never declares the
//! connection dead on its own; that is left to the transport's close and error
//! signals.

use std::time::Duration;

use rts_core::id::now_ms;
use rts_core::Message;

use super::timer::Timer;

#[derive(Debug)]
pub struct HeartbeatMonitor {
    interval: Duration,
    timer: Timer,
    last_sync_time: Option<i64>,
    sent: u64,
}

impl HeartbeatMonitor {
    pub fn new(interval: Duration) -> Self {
        HeartbeatMonitor {
            interval,
            timer: Timer::new(),
            last_sync_time: None,
            sent: 0,
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

    /// Acknowledge a tick and build the heartbeat to send.
    pub fn tick(&mut self, client_id: &str) -> Message {
        self.timer.fire();
        self.sent += 1;
        Message::heartbeat(client_id)
    }

    /// Record a heartbeat received from the remote side.
    pub fn record_remote(&mut self) {
        self.last_sync_time = Some(now_ms());
    }

    /// Time of the last remote heartbeat, in epoch milliseconds.
    pub fn last_sync_time(&self) -> Option<i64> {
        self.last_sync_time
    }

    /// Number of heartbeats built so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
