// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Frame encoding with compression marking.
//!
//! Messages whose serialized form reaches the compression threshold are marked
//! `compressed` with their `originalSize`. In [`CompressionMode::Deflate`] the
//! payload itself is replaced by base64(zlib(json)); decoding reverses that for
//! any inbound frame carrying a compressed string payload.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde_json::Value;

use rts_core::{CompressionMode, Message, SyncConfig};

/// Error type for codec operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("compression error: {0}")]
    Compression(#[from] std::io::Error),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Encodes outbound messages and decodes inbound frames.
#[derive(Debug, Clone, Copy)]
pub struct MessageCodec {
    threshold: usize,
    mode: CompressionMode,
}

impl MessageCodec {
    pub fn new(threshold: usize, mode: CompressionMode) -> Self {
        MessageCodec { threshold, mode }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.compression_threshold_bytes, config.compression)
    }

    /// Prepares a message for the wire, marking it compressed when large.
    pub fn prepare(&self, msg: &Message) -> CodecResult<Message> {
        let size = msg.to_json()?.len();
        if size < self.threshold {
            return Ok(msg.clone());
        }

        let mut prepared = msg.clone();
        prepared.compressed = true;
        prepared.original_size = Some(size);

        if self.mode == CompressionMode::Deflate {
            if let Some(data) = prepared.data.take() {
                prepared.data = Some(Value::String(deflate(&data)?));
            }
        }
        Ok(prepared)
    }

    /// Serializes a message into a text frame.
    pub fn encode(&self, msg: &Message) -> CodecResult<String> {
        Ok(self.prepare(msg)?.to_json()?)
    }

    /// Parses a text frame, inflating a deflated payload.
    pub fn decode(&self, text: &str) -> CodecResult<Message> {
        let mut msg = Message::from_json(text)?;
        if msg.compressed {
            if let Some(Value::String(packed)) = &msg.data {
                msg.data = Some(inflate(packed)?);
            }
        }
        Ok(msg)
    }
}

fn deflate(data: &Value) -> CodecResult<String> {
    let json = serde_json::to_vec(data)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let bytes = encoder.finish()?;
    Ok(STANDARD.encode(bytes))
}

fn inflate(packed: &str) -> CodecResult<Value> {
    let bytes = STANDARD.decode(packed)?;
    let mut decoder = ZlibDecoder::new(bytes.as_slice());
    let mut json = Vec::new();
    decoder.read_to_end(&mut json)?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
