// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shape and size checks applied before a message is queued or transmitted.

use rts_core::{Message, SyncConfig};

/// Why a message was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("message type is missing or empty")]
    MissingType,

    #[error("message '{0}' has no payload")]
    MissingPayload(String),

    #[error("message '{kind}' is {size} bytes, over the {max} byte limit")]
    TooLarge {
        kind: String,
        size: usize,
        max: usize,
    },

    #[error("message could not be serialized: {0}")]
    Unserializable(String),
}

/// Validates outbound and inbound message envelopes.
#[derive(Debug, Clone, Copy)]
pub struct MessageValidator {
    max_size: usize,
}

impl MessageValidator {
    pub fn new(max_size: usize) -> Self {
        MessageValidator { max_size }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.max_message_size_bytes)
    }

    /// Checks that the message has a type and payload and fits the size limit.
    ///
    /// Returns the serialized size on success.
    pub fn validate(&self, msg: &Message) -> Result<usize, ValidationError> {
        if msg.kind.trim().is_empty() {
            return Err(ValidationError::MissingType);
        }
        if msg.data.is_none() {
            return Err(ValidationError::MissingPayload(msg.kind.clone()));
        }

        let size = msg
            .to_json()
            .map_err(|e| ValidationError::Unserializable(e.to_string()))?
            .len();
        if size > self.max_size {
            return Err(ValidationError::TooLarge {
                kind: msg.kind.clone(),
                size,
                max: self.max_size,
            });
        }
        Ok(size)
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
