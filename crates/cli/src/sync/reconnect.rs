// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential backoff for reconnection attempts.
//!
//! `delay(n) = min(base * 2^(n-1), max)` for attempt `n >= 1`.

use std::time::Duration;

use rts_core::SyncConfig;

use super::timer::Timer;

/// Outcome of asking for the next reconnect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// A retry is armed to fire after `delay`.
    Scheduled { attempt: u32, delay: Duration },
    /// The attempt budget is spent; nothing is armed.
    Exhausted { attempts: u32 },
}

#[derive(Debug)]
pub struct ReconnectionScheduler {
    base_delay_ms: u64,
    max_delay_ms: u64,
    max_attempts: u32,
    attempt: u32,
    timer: Timer,
}

impl ReconnectionScheduler {
    pub fn new(base_delay_ms: u64, max_delay_ms: u64, max_attempts: u32) -> Self {
        ReconnectionScheduler {
            base_delay_ms,
            max_delay_ms,
            max_attempts,
            attempt: 0,
            timer: Timer::new(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(
            config.base_reconnect_delay_ms,
            config.max_reconnect_delay_ms,
            config.max_reconnect_attempts,
        )
    }

    /// Backoff delay for a 1-based attempt number.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63);
        let factor = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
        let raw = self.base_delay_ms.saturating_mul(factor);
        Duration::from_millis(raw.min(self.max_delay_ms))
    }

    /// Arm the next attempt, or report that the budget is spent.
    pub fn schedule_next(&mut self) -> ReconnectDecision {
        if self.attempt >= self.max_attempts {
            self.timer.cancel();
            return ReconnectDecision::Exhausted {
                attempts: self.attempt,
            };
        }
        self.attempt += 1;
        let delay = self.delay_for(self.attempt);
        self.timer.arm_once(delay);
        ReconnectDecision::Scheduled {
            attempt: self.attempt,
            delay,
        }
    }

    /// Acknowledge that the armed retry fired.
    pub fn fire(&mut self) {
        self.timer.fire();
    }

    /// Cancel any armed retry, keeping the attempt count.
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    /// Forget past attempts and cancel any armed retry.
    pub fn reset(&mut self) {
        self.attempt = 0;
        self.timer.cancel();
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }
}

#[cfg(test)]
#[path = "reconnect_tests.rs"]
mod tests;
