// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

const QUICKSTART_HELP: &str = "\
Get started:
  rtsync watch --url ws://localhost:7890   Connect and stream events
  rtsync config                            Show the effective configuration
  rtsync id                                Show this machine's client id

While watching, type commands on stdin:
  set <key> <json>     Record a local change for the next sync
  send <type> <json>   Send a message (queued while disconnected)
  flush                Send pending changes now
  status               Print a status snapshot
  connect | disconnect Open or close the connection
  online | offline     Report network availability
  quit                 Disconnect and exit";

#[derive(Parser, Debug)]
#[command(name = "rtsync")]
#[command(version)]
#[command(about = "Real-time sync client with offline queueing and automatic reconnects")]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to a sync server and stream events as JSON lines
    Watch(WatchArgs),

    /// Print the effective configuration as TOML
    Config(ConfigArgs),

    /// Print the persistent client id, creating it if needed
    Id {
        /// File holding the client id
        #[arg(long)]
        identity: Option<PathBuf>,
    },
}

/// Options shared by commands that load configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Server URL, overriding the config file
    #[arg(short, long)]
    pub url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// File holding the client id
    #[arg(long)]
    pub identity: Option<PathBuf>,

    /// Start in offline mode without connecting
    #[arg(long)]
    pub offline: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
