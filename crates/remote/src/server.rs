// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Handles client connections, message routing, and broadcast fanout.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Map, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use rts_core::id::now_ms;
use rts_core::protocol::{kind, SyncPayload};
use rts_core::{ChangeRecord, Message};

use crate::state::{ConnectionId, ServerState};

/// Client id the relay puts in its own heartbeats.
pub const RELAY_ID: &str = "rts-relay";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Run the WebSocket server on the given address.
pub async fn run(addr: SocketAddr, state: ServerState) -> Result<(), BoxError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);
    serve(listener, state).await
}

/// Accept connections on an already bound listener.
pub async fn serve(listener: TcpListener, state: ServerState) -> Result<(), BoxError> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
) -> Result<(), BoxError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let conn = state.register_connection();
    info!("New WebSocket connection {} from: {}", conn, peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    // Subscribe to broadcasts
    let mut broadcast_rx = state.subscribe();

    // Catch the new client up on everything stored so far
    let stored = state.snapshot().await;
    if !stored.is_empty() {
        debug!("Sending {} stored values to {}", stored.len(), conn);
        let catch_up = sync_broadcast(RELAY_ID, stored.into_iter().collect());
        ws_sink.send(WsMessage::Text(catch_up.to_json()?.into())).await?;
    }

    loop {
        tokio::select! {
            // Handle incoming messages from client
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        let reply = match handle_client_message(text.as_str(), &state, conn).await {
                            Ok(reply) => reply,
                            Err(e) => Some(error_message("invalid_message", e.to_string())),
                        };
                        if let Some(reply) = reply {
                            ws_sink.send(WsMessage::Text(reply.to_json()?.into())).await?;
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        info!("Client {} disconnected", peer_addr);
                        break;
                    }
                    Some(Ok(WsMessage::Ping(data))) => {
                        ws_sink.send(WsMessage::Pong(data)).await?;
                    }
                    Some(Ok(_)) => {
                        // Ignore other message types (Binary, Pong, Frame)
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error from {}: {}", peer_addr, e);
                        break;
                    }
                    None => {
                        info!("Client {} stream ended", peer_addr);
                        break;
                    }
                }
            }

            // Relay messages from other connections
            broadcast = broadcast_rx.recv() => {
                match broadcast {
                    Ok(broadcast) if broadcast.origin == conn => {}
                    Ok(broadcast) => {
                        let json = broadcast.message.to_json()?;
                        if let Err(e) = ws_sink.send(WsMessage::Text(json.into())).await {
                            warn!("Failed to send broadcast to {}: {}", peer_addr, e);
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Client {} lagged by {} messages", peer_addr, n);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Builds an `error` message for the client.
pub(crate) fn error_message(code: &str, message: impl Into<String>) -> Message {
    Message::new(
        kind::ERROR,
        json!({ "code": code, "message": message.into() }),
    )
}

/// Builds the `sync_data` relayed to other clients after changes are applied.
pub(crate) fn sync_broadcast(origin: &str, applied: Vec<(String, ChangeRecord)>) -> Message {
    let changes: Map<String, Value> = applied
        .into_iter()
        .map(|(key, change)| {
            (
                key,
                json!({ "value": change.value, "timestamp": change.timestamp }),
            )
        })
        .collect();
    Message::new(
        kind::SYNC_DATA,
        json!({ "changes": changes, "origin": origin, "timestamp": now_ms() }),
    )
}

/// Process a client message and return an optional response.
pub(crate) async fn handle_client_message(
    text: &str,
    state: &ServerState,
    conn: ConnectionId,
) -> Result<Option<Message>, BoxError> {
    let msg = Message::from_json(text)?;
    debug!("Received {} message {} from {}", msg.kind, msg.id, conn);

    if msg.kind.trim().is_empty() {
        return Ok(Some(error_message(
            "invalid_message",
            "message type is required",
        )));
    }
    let Some(data) = &msg.data else {
        return Ok(Some(error_message(
            "invalid_message",
            format!("{} message has no data", msg.kind),
        )));
    };
    if msg.compressed && data.is_string() {
        return Ok(Some(error_message(
            "unsupported",
            "deflated payloads are not supported by this relay",
        )));
    }

    let msg_kind = msg.kind.clone();
    match msg_kind.as_str() {
        kind::HEARTBEAT => Ok(Some(Message::heartbeat(RELAY_ID))),

        kind::SYNC_DATA => {
            let payload: SyncPayload = serde_json::from_value(data.clone())?;
            let received = payload.changes.len();
            let applied = state.apply_changes(payload.changes).await;
            debug!(
                "Applied {}/{} changes from {}",
                applied.len(),
                received,
                payload.client_id
            );
            if !applied.is_empty() {
                state.broadcast(conn, sync_broadcast(&payload.client_id, applied));
            }
            Ok(None) // Other clients hear about it via broadcast
        }

        kind::MINING_UPDATE | kind::USER_UPDATE | kind::NOTIFICATION => {
            state.broadcast(conn, msg);
            Ok(None)
        }

        other => Ok(Some(error_message(
            "unknown_type",
            format!("unknown message type '{}'", other),
        ))),
    }
}
