// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the sync module.
//!
//! These tests run the client over the real WebSocket transport against an
//! in-process server:
//! - Queue flush and inbound dispatch over a live socket
//! - Normal and abnormal server closes
//! - Connection refusal feeding the reconnect schedule

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::future::Future;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rts_core::protocol::kind;
use rts_core::{MemoryIdentityStore, Message, SyncConfig};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::WebSocketStream;

use super::client::{ConnectionState, SyncClient};
use super::events::EventKind;
use super::test_helpers::{kinds, make_test_message, record_events};

type ServerSocket = WebSocketStream<TcpStream>;

/// Accept one WebSocket connection and hand it to `handler`.
async fn serve_once<F, Fut>(handler: F) -> String
where
    F: FnOnce(ServerSocket) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        handler(ws).await;
    });
    format!("ws://{}", addr)
}

async fn next_message(ws: &mut ServerSocket) -> Message {
    loop {
        match ws.next().await.expect("client frame").unwrap() {
            WsMessage::Text(text) => return Message::from_json(text.as_str()).unwrap(),
            _ => continue,
        }
    }
}

fn live_config(url: String) -> SyncConfig {
    SyncConfig {
        sync_interval_ms: 60_000,
        heartbeat_interval_ms: 60_000,
        base_reconnect_delay_ms: 50,
        max_reconnect_delay_ms: 200,
        max_reconnect_attempts: 2,
        connect_timeout_ms: 2_000,
        ..SyncConfig::with_url(url)
    }
}

fn live_client(url: String) -> SyncClient {
    SyncClient::new(live_config(url), &MemoryIdentityStore::with_id("client_live")).unwrap()
}

async fn turn(client: &mut SyncClient) {
    tokio::time::timeout(Duration::from_secs(5), client.turn())
        .await
        .expect("client made progress");
}

#[tokio::test]
async fn test_queued_messages_reach_live_server() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let url = serve_once(move |mut ws| async move {
        for _ in 0..2 {
            let msg = next_message(&mut ws).await;
            tx.send(msg.id).unwrap();
        }
        let _ = ws.close(None).await;
    })
    .await;

    let mut client = live_client(url);
    client.send(make_test_message(1)).await;
    client.send(make_test_message(2)).await;
    client.connect().await;
    assert_eq!(client.connection_state(), ConnectionState::Connected);
    assert_eq!(client.queued_messages(), 0);

    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
    assert_eq!(first.as_deref(), Some("msg-1"));
    assert_eq!(second.as_deref(), Some("msg-2"));
}

#[tokio::test]
async fn test_server_push_and_normal_close() {
    let url = serve_once(|mut ws| async move {
        let push = Message::new(kind::NOTIFICATION, json!({ "message": "welcome" }));
        ws.send(WsMessage::Text(push.to_json().unwrap().into()))
            .await
            .unwrap();
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "done".into(),
        };
        let _ = ws.close(Some(frame)).await;
    })
    .await;

    let mut client = live_client(url);
    let events = record_events(&mut client);
    client.connect().await;

    turn(&mut client).await;
    turn(&mut client).await;

    assert_eq!(
        kinds(&events),
        vec![
            EventKind::Connected,
            EventKind::Notification,
            EventKind::Disconnected,
        ]
    );
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    assert!(!client.reconnect_armed());
}

#[tokio::test]
async fn test_abnormal_close_schedules_reconnect() {
    let url = serve_once(|mut ws| async move {
        let frame = CloseFrame {
            code: CloseCode::Away,
            reason: "restarting".into(),
        };
        let _ = ws.close(Some(frame)).await;
    })
    .await;

    let mut client = live_client(url);
    client.connect().await;
    turn(&mut client).await;

    assert_eq!(client.connection_state(), ConnectionState::Reconnecting);
    assert!(client.reconnect_armed());
}

#[tokio::test]
async fn test_refused_connection_exhausts_attempts() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = live_client(format!("ws://{}", addr));
    let events = record_events(&mut client);

    client.connect().await;
    assert_eq!(client.connection_state(), ConnectionState::Reconnecting);

    turn(&mut client).await;
    turn(&mut client).await;

    assert_eq!(client.connection_state(), ConnectionState::Failed);
    let recorded = kinds(&events);
    assert_eq!(
        recorded
            .iter()
            .filter(|k| **k == EventKind::ConnectionError)
            .count(),
        3
    );
    assert_eq!(
        recorded.last(),
        Some(&EventKind::MaxReconnectAttemptsReached)
    );
}

#[tokio::test]
async fn test_intentional_disconnect_sends_normal_close() {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let url = serve_once(move |mut ws| async move {
        while let Some(frame) = ws.next().await {
            if let Ok(WsMessage::Close(close)) = frame {
                let _ = tx.send(close.map(|c| u16::from(c.code)));
                return;
            }
        }
    })
    .await;

    let mut client = live_client(url);
    client.connect().await;
    client.disconnect(true).await;

    let code = tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(code, Some(1000));
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
}
