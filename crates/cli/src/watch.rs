// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `rtsync watch`: an interactive session over a running sync client.
//!
//! Events are written to stdout as one JSON object per line. Commands are
//! read from stdin, one per line.

use std::path::PathBuf;
use std::str::FromStr;

use rts_core::{FileIdentityStore, Message, SyncConfig};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::cli::{ConfigArgs, WatchArgs};
use crate::error::{Error, Result};
use crate::sync::{self, ConnectionStatus, EventKind, SyncClient, SyncHandle};

/// A line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Set { key: String, value: Value },
    Send { kind: String, data: Value },
    Flush,
    Status,
    Connect,
    Disconnect,
    Online,
    Offline,
    Quit,
}

/// Parses a JSON argument, taking bare words as strings.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

impl FromStr for Input {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let input = match command {
            "set" => {
                let (key, raw) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| Error::InvalidInput("usage: set <key> <json>".to_string()))?;
                Input::Set {
                    key: key.to_string(),
                    value: parse_value(raw.trim()),
                }
            }
            "send" => {
                let (kind, raw) = match rest.split_once(char::is_whitespace) {
                    Some((kind, raw)) => (kind, raw.trim()),
                    None => (rest, "{}"),
                };
                if kind.is_empty() {
                    return Err(Error::InvalidInput(
                        "usage: send <type> [json]".to_string(),
                    ));
                }
                Input::Send {
                    kind: kind.to_string(),
                    data: parse_value(raw),
                }
            }
            "flush" => Input::Flush,
            "status" => Input::Status,
            "connect" => Input::Connect,
            "disconnect" => Input::Disconnect,
            "online" => Input::Online,
            "offline" => Input::Offline,
            "quit" | "exit" => Input::Quit,
            other => {
                return Err(Error::InvalidInput(format!("unknown command '{}'", other)));
            }
        };
        Ok(input)
    }
}

/// Default config file location: `<config dir>/rtsync/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rtsync").join("config.toml"))
}

/// Loads the config file (explicit path, else the default location if it
/// exists, else built-in defaults) and applies command line overrides.
pub fn load_config(args: &ConfigArgs) -> Result<SyncConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| default_config_path().filter(|p| p.exists()));

    let mut config = match path {
        Some(path) => {
            debug!("loading config from {}", path.display());
            SyncConfig::load(&path)?
        }
        None => SyncConfig::default(),
    };

    if let Some(url) = &args.url {
        config.server_url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Human-readable one-line status.
pub fn format_status(status: &ConnectionStatus) -> String {
    let last_sync = status
        .last_sync_time
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    let mut line = format!(
        "{} | attempts: {} | queued: {} | pending: {} | last sync: {}",
        status.state,
        status.connection_attempts,
        status.queued_messages,
        status.pending_changes,
        last_sync
    );
    if status.offline_mode {
        line.push_str(" | offline");
    }
    line
}

async fn apply(handle: &SyncHandle, input: Input) -> Result<()> {
    match input {
        Input::Set { key, value } => handle.record_change(key, value).await?,
        Input::Send { kind, data } => handle.send(Message::new(kind, data)).await?,
        Input::Flush => handle.flush_pending().await?,
        Input::Status => {
            let status = handle.status().await?;
            eprintln!("{}", format_status(&status));
        }
        Input::Connect => handle.connect().await?,
        Input::Disconnect => handle.disconnect(true).await?,
        Input::Online => handle.set_online(true).await?,
        Input::Offline => handle.set_online(false).await?,
        Input::Quit => handle.shutdown().await?,
    }
    Ok(())
}

/// Runs a watch session until `quit`, end of input, or Ctrl-C.
pub async fn run(args: WatchArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let identity = match args.identity {
        Some(path) => FileIdentityStore::new(path),
        None => FileIdentityStore::default_location(),
    };

    let client = SyncClient::new(config, &identity)?;
    info!(
        client_id = client.client_id(),
        url = %client.config().server_url,
        "starting sync client"
    );
    let (handle, task) = sync::spawn(client);

    for kind in EventKind::ALL {
        handle
            .on(kind, |event| {
                println!("{}", serde_json::to_string(event)?);
                Ok(())
            })
            .await?;
    }

    if args.offline {
        handle.set_online(false).await?;
    } else {
        handle.connect().await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Input>() {
                    Ok(Input::Quit) => break,
                    Ok(input) => apply(&handle, input).await?,
                    Err(e) => warn!("{}", e),
                }
            }
        }
    }

    // The task may already be gone if it was cancelled
    let _ = handle.shutdown().await;
    if let Err(e) = task.await {
        warn!("sync client task failed: {}", e);
    }
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
