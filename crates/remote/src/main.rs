// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rts-relay: WebSocket relay server for rtsync clients.
//!
//! Answers heartbeats, keeps the latest value per key (last write wins),
//! and fans sync and update messages out to every other connected client.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// rts-relay: Real-time sync relay server
#[derive(Parser, Debug)]
#[command(name = "rts-relay")]
#[command(about = "WebSocket relay server for real-time sync clients")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting rts-relay");
    info!("  Bind address: {}", args.bind);

    let state = state::ServerState::new();
    server::run(args.bind, state).await?;

    Ok(())
}
