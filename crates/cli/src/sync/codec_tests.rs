// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the message codec.

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;

fn big_message() -> Message {
    Message::new("sync_data", json!({ "body": "z".repeat(4096) }))
}

#[test]
fn small_message_is_untouched() {
    let codec = MessageCodec::new(1024, CompressionMode::Mark);
    let msg = Message::new("heartbeat", json!({ "t": 1 }));
    let prepared = codec.prepare(&msg).unwrap();
    assert_eq!(prepared, msg);
    assert!(!prepared.compressed);
}

#[test]
fn large_message_is_marked_with_original_size() {
    let codec = MessageCodec::new(1024, CompressionMode::Mark);
    let msg = big_message();
    let size = msg.to_json().unwrap().len();

    let prepared = codec.prepare(&msg).unwrap();
    assert!(prepared.compressed);
    assert_eq!(prepared.original_size, Some(size));
    assert_eq!(prepared.data, msg.data);
}

#[test]
fn threshold_is_inclusive() {
    let msg = Message::new("edge", json!({}));
    let size = msg.to_json().unwrap().len();

    assert!(MessageCodec::new(size, CompressionMode::Mark).prepare(&msg).unwrap().compressed);
    assert!(!MessageCodec::new(size + 1, CompressionMode::Mark).prepare(&msg).unwrap().compressed);
}

#[test]
fn deflate_shrinks_repetitive_payload() {
    let codec = MessageCodec::new(1024, CompressionMode::Deflate);
    let msg = big_message();

    let frame = codec.encode(&msg).unwrap();
    assert!(frame.len() < msg.to_json().unwrap().len());

    let wire: Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(wire["compressed"], true);
    assert!(wire["data"].is_string());
}

#[test]
fn decode_inflates_deflated_payload() {
    let codec = MessageCodec::new(1024, CompressionMode::Deflate);
    let msg = big_message();

    let decoded = codec.decode(&codec.encode(&msg).unwrap()).unwrap();
    assert!(decoded.compressed);
    assert_eq!(decoded.data, msg.data);
}

#[test]
fn decode_leaves_marked_payload_alone() {
    let codec = MessageCodec::new(1024, CompressionMode::Mark);
    let msg = big_message();

    let decoded = codec.decode(&codec.encode(&msg).unwrap()).unwrap();
    assert_eq!(decoded.data, msg.data);
}

#[test]
fn decode_rejects_garbage() {
    let codec = MessageCodec::new(1024, CompressionMode::Mark);
    assert!(matches!(codec.decode("not json"), Err(CodecError::Json(_))));

    let bad = r#"{"type":"sync_data","data":"%%%","compressed":true}"#;
    assert!(matches!(codec.decode(bad), Err(CodecError::Base64(_))));
}
