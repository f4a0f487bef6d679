// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque identifier generation for clients and messages.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use sha2::{Digest, Sha256};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate an ID of the form `{prefix}_{millis}_{hash}`.
///
/// The hash covers the timestamp, a process-wide counter and 16 random
/// bytes, so two processes started in the same instant still diverge.
pub fn generate_id(prefix: &str) -> String {
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let entropy: [u8; 16] = rand::random();
    id_from_parts(prefix, Utc::now().timestamp_millis(), seq, &entropy)
}

fn id_from_parts(prefix: &str, millis: i64, seq: u64, entropy: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(millis.to_be_bytes());
    hasher.update(seq.to_be_bytes());
    hasher.update(entropy);
    let hash = hasher.finalize();
    format!("{}_{}_{}", prefix, millis, hex::encode(&hash[..4]))
}

/// Generate a message ID.
pub fn message_id() -> String {
    generate_id("msg")
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
