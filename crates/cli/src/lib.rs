// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rtsync - A real-time synchronization client library.
//!
//! Keeps a WebSocket connection to a sync server alive across network
//! failures, queues outbound messages while disconnected, batches local
//! changes, and reports everything as typed events.
//!
//! # Main Components
//!
//! - [`sync::SyncClient`] - The client actor: connection lifecycle, queueing, timers
//! - [`sync::SyncHandle`] - Cloneable handle to a client running on its own task
//! - [`sync::EventKind`] / [`sync::SyncEvent`] - What subscribers can listen for
//! - [`Error`] - Error types for the command line
//!
//! # Usage
//!
//! ```rust,ignore
//! use rts_core::{FileIdentityStore, SyncConfig};
//! use rtsync::sync::{self, EventKind, SyncClient};
//!
//! let config = SyncConfig::with_url("ws://localhost:7890");
//! let client = SyncClient::new(config, &FileIdentityStore::default_location())?;
//! let (handle, task) = sync::spawn(client);
//!
//! handle.on(EventKind::Notification, |event| {
//!     println!("{:?}", event);
//!     Ok(())
//! }).await?;
//! handle.connect().await?;
//! ```

mod cli;
mod watch;

pub mod error;
pub mod sync;

pub use cli::{Cli, Command, ConfigArgs, WatchArgs};
pub use error::{Error, Result};
pub use watch::{load_config, Input};

use rts_core::{load_or_create_client_id, FileIdentityStore};

/// Configure the global tracing subscriber.
///
/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` takes
/// precedence over `verbose`.
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed (e.g. in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run a parsed command.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Watch(args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(watch::run(args))
        }
        Command::Config(args) => {
            let config = load_config(&args)?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Id { identity } => {
            let store = match identity {
                Some(path) => FileIdentityStore::new(path),
                None => FileIdentityStore::default_location(),
            };
            println!("{}", load_or_create_client_id(&store)?);
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
