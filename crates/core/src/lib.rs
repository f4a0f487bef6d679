// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rts-core: Shared library for the rtsync real-time sync client.
//!
//! This crate provides the wire protocol, configuration, identity persistence
//! and error types used by both the rtsync client and the rts-relay server.

pub mod config;
pub mod error;
pub mod id;
pub mod identity;
pub mod protocol;

pub use config::{CompressionMode, SyncConfig};
pub use error::{Error, Result};
pub use identity::{
    load_or_create_client_id, FileIdentityStore, IdentityStore, MemoryIdentityStore,
};
pub use protocol::{ChangeRecord, Inbound, Message, ProtocolError};
