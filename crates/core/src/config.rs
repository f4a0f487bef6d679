// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync client configuration.
//!
//! Every field has a default, so a config file only needs to name the values
//! it overrides:
//!
//! ```toml
//! server_url = "wss://sync.example.com/ws"
//! heartbeat_interval_ms = 15000
//! compression = "deflate"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How payloads at or above the compression threshold are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMode {
    /// Mark the message as compressed and record its original size only.
    #[default]
    Mark,
    /// Mark the message and replace `data` with base64(zlib(json)).
    Deflate,
}

/// Immutable sync client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// WebSocket URL of the remote service.
    pub server_url: String,
    /// Interval between outbound heartbeats while connected.
    pub heartbeat_interval_ms: u64,
    /// Interval between pending-change flushes while connected.
    pub sync_interval_ms: u64,
    /// Serialized size at which a message is marked compressed.
    pub compression_threshold_bytes: usize,
    /// Messages larger than this are rejected.
    pub max_message_size_bytes: usize,
    /// Reconnect attempts before giving up and entering `Failed`.
    pub max_reconnect_attempts: u32,
    /// Delay before the first reconnect attempt.
    pub base_reconnect_delay_ms: u64,
    /// Upper bound for the exponential backoff delay.
    pub max_reconnect_delay_ms: u64,
    /// Capacity of the outbound queue (drop-oldest beyond this).
    pub max_queue_size: usize,
    /// Max time to wait for the transport handshake.
    pub connect_timeout_ms: u64,
    /// Compression handling for large payloads.
    pub compression: CompressionMode,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            server_url: "ws://localhost:7890".to_string(),
            heartbeat_interval_ms: 30_000,
            sync_interval_ms: 5_000,
            compression_threshold_bytes: 1024,
            max_message_size_bytes: 1024 * 1024,
            max_reconnect_attempts: 10,
            base_reconnect_delay_ms: 1_000,
            max_reconnect_delay_ms: 30_000,
            max_queue_size: 1000,
            connect_timeout_ms: 10_000,
            compression: CompressionMode::Mark,
        }
    }
}

impl SyncConfig {
    /// Creates a default config pointing at the given server.
    pub fn with_url(url: impl Into<String>) -> Self {
        SyncConfig {
            server_url: url.into(),
            ..SyncConfig::default()
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: SyncConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks the config for values the client cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(Error::invalid_config("server_url", "must not be empty"));
        }
        if !(self.server_url.starts_with("ws://") || self.server_url.starts_with("wss://")) {
            return Err(Error::InvalidServerUrl(self.server_url.clone()));
        }
        if self.heartbeat_interval_ms == 0 {
            return Err(Error::invalid_config(
                "heartbeat_interval_ms",
                "must be greater than zero",
            ));
        }
        if self.sync_interval_ms == 0 {
            return Err(Error::invalid_config(
                "sync_interval_ms",
                "must be greater than zero",
            ));
        }
        if self.max_queue_size == 0 {
            return Err(Error::invalid_config(
                "max_queue_size",
                "must be greater than zero",
            ));
        }
        if self.max_message_size_bytes == 0 {
            return Err(Error::invalid_config(
                "max_message_size_bytes",
                "must be greater than zero",
            ));
        }
        if self.compression_threshold_bytes > self.max_message_size_bytes {
            return Err(Error::invalid_config(
                "compression_threshold_bytes",
                format!(
                    "{} exceeds max_message_size_bytes ({})",
                    self.compression_threshold_bytes, self.max_message_size_bytes
                ),
            ));
        }
        if self.base_reconnect_delay_ms > self.max_reconnect_delay_ms {
            return Err(Error::invalid_config(
                "base_reconnect_delay_ms",
                format!(
                    "{} exceeds max_reconnect_delay_ms ({})",
                    self.base_reconnect_delay_ms, self.max_reconnect_delay_ms
                ),
            ));
        }
        Ok(())
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
