// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deadline timers owned by the client actor.
//!
//! A `Timer` is only a deadline (plus an optional period). Nothing runs in the
//! background: the actor loop awaits [`Timer::wait`] alongside its other event
//! sources and calls [`Timer::fire`] when it wins. Cancelling is therefore a
//! plain field write, and a cancelled timer can never fire late.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

#[derive(Debug, Default, Clone)]
pub struct Timer {
    deadline: Option<Instant>,
    period: Option<Duration>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot deadline `delay` from now.
    pub fn arm_once(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
        self.period = None;
    }

    /// Arm a repeating deadline, first firing one `period` from now.
    pub fn arm_every(&mut self, period: Duration) {
        self.deadline = Some(Instant::now() + period);
        self.period = Some(period);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
        self.period = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline has passed.
    pub fn is_due(&self) -> bool {
        self.deadline.is_some_and(|d| d <= Instant::now())
    }

    /// Acknowledge a firing: periodic timers advance, one-shot timers disarm.
    ///
    /// A periodic timer that fell more than one period behind skips the missed
    /// ticks instead of bursting.
    pub fn fire(&mut self) {
        match (self.deadline, self.period) {
            (Some(deadline), Some(period)) => {
                let now = Instant::now();
                let next = deadline + period;
                self.deadline = Some(if next <= now { now + period } else { next });
            }
            _ => self.cancel(),
        }
    }

    /// Resolves when the deadline passes; never resolves while disarmed.
    pub async fn wait(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
