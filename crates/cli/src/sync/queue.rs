// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded queue for messages that cannot be sent while disconnected.
//!
//! The queue keeps at most `capacity` entries. Pushing onto a full queue evicts
//! the oldest entry, favoring fresh data over completeness. On reconnect the
//! whole queue is drained in enqueue order.

use std::collections::VecDeque;

use rts_core::id::now_ms;
use rts_core::Message;
use tracing::{debug, warn};

/// A queued message and the time it was enqueued.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
    pub message: Message,
    pub enqueued_at: i64,
}

/// Drop-oldest FIFO of outbound messages.
#[derive(Debug, Clone)]
pub struct OutboundQueue {
    entries: VecDeque<QueueEntry>,
    capacity: usize,
    evicted: u64,
}

impl OutboundQueue {
    /// Create an empty queue. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        OutboundQueue {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            evicted: 0,
        }
    }

    /// Append a message, evicting the oldest entry when full.
    ///
    /// Returns the evicted entry, if any.
    pub fn push(&mut self, message: Message) -> Option<QueueEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.evicted += 1;
            self.entries.pop_front()
        } else {
            None
        };
        if let Some(ref entry) = evicted {
            warn!(
                id = %entry.message.id,
                kind = %entry.message.kind,
                "outbound queue full, dropped oldest message"
            );
        }

        self.entries.push_back(QueueEntry {
            message,
            enqueued_at: now_ms(),
        });
        debug!("message queued ({}/{})", self.entries.len(), self.capacity);
        evicted
    }

    /// Remove and return every entry in enqueue order.
    pub fn drain(&mut self) -> Vec<QueueEntry> {
        self.entries.drain(..).collect()
    }

    /// Put entries back at the front, ahead of anything queued since.
    ///
    /// Used when a drain stops part-way. Entries beyond capacity are dropped
    /// from the oldest end, as with `push`.
    pub fn restore_front(&mut self, entries: Vec<QueueEntry>) {
        for entry in entries.into_iter().rev() {
            self.entries.push_front(entry);
        }
        while self.entries.len() > self.capacity {
            self.evicted += 1;
            if let Some(entry) = self.entries.pop_front() {
                warn!(id = %entry.message.id, "outbound queue full, dropped oldest message");
            }
        }
    }

    /// Read all queued messages without removing them.
    pub fn peek_all(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of entries dropped by the eviction policy.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
