// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol messages for client-server communication.
//!
//! Every frame is a JSON object with the same envelope:
//!
//! ```json
//! { "type": "sync_data", "data": {...}, "timestamp": 1700000000000,
//!   "id": "msg_...", "compressed": false, "originalSize": 2048 }
//! ```
//!
//! The envelope is deliberately loose ([`Message`]) so that malformed frames can
//! be inspected and rejected; recognized types are then decoded into the closed
//! [`Inbound`] sum type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::{message_id, now_ms};

/// Outbound and inbound message type names.
pub mod kind {
    pub const HEARTBEAT: &str = "heartbeat";
    pub const SYNC_DATA: &str = "sync_data";
    pub const MINING_UPDATE: &str = "mining_update";
    pub const USER_UPDATE: &str = "user_update";
    pub const NOTIFICATION: &str = "notification";
    pub const ERROR: &str = "error";
}

/// Message envelope as carried on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Message type. Must be non-empty.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Payload. Required; `None` means the field was missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Creation time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
    /// Opaque message ID.
    #[serde(default)]
    pub id: String,
    /// Set when the serialized message reached the compression threshold.
    #[serde(default)]
    pub compressed: bool,
    /// Serialized size before compression, when `compressed` is set.
    #[serde(
        rename = "originalSize",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_size: Option<usize>,
}

impl Message {
    /// Creates a message with a fresh ID and the current timestamp.
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Message {
            kind: kind.into(),
            data: Some(data),
            timestamp: now_ms(),
            id: message_id(),
            compressed: false,
            original_size: None,
        }
    }

    /// Creates a heartbeat message carrying the client identity.
    pub fn heartbeat(client_id: &str) -> Self {
        let now = now_ms();
        let mut msg = Message::new(
            kind::HEARTBEAT,
            serde_json::json!({ "timestamp": now, "client_id": client_id }),
        );
        msg.timestamp = now;
        msg
    }

    /// Creates a sync message from `(key, change)` pairs.
    pub fn sync_data(client_id: &str, changes: Vec<(String, ChangeRecord)>) -> Self {
        let now = now_ms();
        let payload = SyncPayload {
            changes,
            timestamp: now,
            client_id: client_id.to_string(),
        };
        let data = serde_json::to_value(payload).unwrap_or(Value::Null);
        let mut msg = Message::new(kind::SYNC_DATA, data);
        msg.timestamp = now;
        msg
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// A single pending change as sent inside `sync_data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeRecord {
    pub value: Value,
    pub timestamp: i64,
}

/// Outbound `sync_data` payload.
///
/// `changes` serializes as a list of `[key, {value, timestamp}]` pairs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncPayload {
    pub changes: Vec<(String, ChangeRecord)>,
    pub timestamp: i64,
    pub client_id: String,
}

/// Server-pushed state snapshot carried by inbound `sync_data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SyncSnapshot {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub mining_data: Option<Value>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub balance: Option<f64>,
    #[serde(default)]
    pub notifications: Option<Value>,
}

/// Progress report for a mining session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MiningUpdate {
    #[serde(deserialize_with = "lenient::id")]
    pub session_id: String,
    #[serde(deserialize_with = "lenient::number")]
    pub tokens_mined: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub hash_rate: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub efficiency: f64,
}

/// Account-level changes for the current user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserUpdate {
    #[serde(deserialize_with = "lenient::id")]
    pub user_id: String,
    #[serde(deserialize_with = "lenient::number")]
    pub balance: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub mining_power: f64,
    #[serde(default)]
    pub level: Option<u32>,
}

/// User-facing notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub message: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub actions: Option<Value>,
}

/// Error reported by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerError {
    #[serde(default)]
    pub code: Option<Value>,
    pub message: String,
    #[serde(default)]
    pub details: Option<Value>,
}

/// Error decoding a recognized inbound message type.
#[derive(Debug, thiserror::Error)]
#[error("malformed {kind} payload: {source}")]
pub struct ProtocolError {
    pub kind: String,
    #[source]
    pub source: serde_json::Error,
}

/// Inbound messages, closed over the recognized types.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Heartbeat(Value),
    /// `snapshot` is `None` when the payload does not fit [`SyncSnapshot`];
    /// the raw payload is always kept.
    SyncData {
        raw: Value,
        snapshot: Option<SyncSnapshot>,
    },
    MiningUpdate(MiningUpdate),
    UserUpdate(UserUpdate),
    Notification(Notification),
    Error(ServerError),
    /// Any type this client does not know about.
    Unknown {
        kind: String,
    },
}

impl Inbound {
    /// Decodes the payload of an envelope according to its type.
    pub fn from_message(msg: Message) -> Result<Self, ProtocolError> {
        let data = msg.data.unwrap_or(Value::Null);
        let kind = msg.kind;
        let inbound = match kind.as_str() {
            kind::HEARTBEAT => Inbound::Heartbeat(data),
            kind::SYNC_DATA => {
                let snapshot = serde_json::from_value(data.clone()).ok();
                Inbound::SyncData {
                    raw: data,
                    snapshot,
                }
            }
            kind::MINING_UPDATE => Inbound::MiningUpdate(decode(&kind, data)?),
            kind::USER_UPDATE => Inbound::UserUpdate(decode(&kind, data)?),
            kind::NOTIFICATION => Inbound::Notification(decode(&kind, data)?),
            kind::ERROR => Inbound::Error(decode(&kind, data)?),
            _ => Inbound::Unknown { kind },
        };
        Ok(inbound)
    }
}

/// Field decoders that accept the loose shapes servers actually send: ids as
/// strings or numbers, and amounts as numbers or numeric strings.
mod lenient {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;
    use serde_json::Value;

    fn to_id(value: Value) -> Result<String, String> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(format!("expected a string or numeric id, got {}", other)),
        }
    }

    fn to_number(value: Value) -> Result<f64, String> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| format!("number {} is out of range", n)),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("expected a number, got \"{}\"", s)),
            other => Err(format!("expected a number, got {}", other)),
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        to_id(Value::deserialize(d)?).map_err(D::Error::custom)
    }

    pub fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            value => to_id(value).map(Some).map_err(D::Error::custom),
        }
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        to_number(Value::deserialize(d)?).map_err(D::Error::custom)
    }

    pub fn opt_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            value => to_number(value).map(Some).map_err(D::Error::custom),
        }
    }
}

fn decode<T: DeserializeOwned>(kind: &str, data: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(data).map_err(|source| ProtocolError {
        kind: kind.to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
