// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted client identity.
//!
//! The client identifies itself in heartbeats and sync messages with an opaque
//! ID that is created once per installation and reused across restarts. Where
//! the ID lives is up to the embedding application, which injects an
//! [`IdentityStore`].

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::id::generate_id;

const STATE_DIR_NAME: &str = "rtsync";
const CLIENT_ID_FILE_NAME: &str = "client_id";

/// Key-value persistence for the client identity.
pub trait IdentityStore: Send + Sync {
    /// Returns the stored identity, if any.
    fn get(&self) -> Result<Option<String>>;

    /// Stores the identity, replacing any previous value.
    fn set(&self, id: &str) -> Result<()>;
}

/// Returns the stored client ID, creating and persisting one if absent.
pub fn load_or_create_client_id(store: &dyn IdentityStore) -> Result<String> {
    if let Some(id) = store.get()? {
        return Ok(id);
    }
    let id = generate_id("client");
    store.set(&id)?;
    Ok(id)
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    id: Mutex<Option<String>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with an identity.
    pub fn with_id(id: impl Into<String>) -> Self {
        MemoryIdentityStore {
            id: Mutex::new(Some(id.into())),
        }
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn get(&self) -> Result<Option<String>> {
        let guard = self
            .id
            .lock()
            .map_err(|_| Error::Identity("identity lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn set(&self, id: &str) -> Result<()> {
        let mut guard = self
            .id
            .lock()
            .map_err(|_| Error::Identity("identity lock poisoned".to_string()))?;
        *guard = Some(id.to_string());
        Ok(())
    }
}

/// Stores the identity as a single-line file.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileIdentityStore { path: path.into() }
    }

    /// Store at `$XDG_STATE_HOME/rtsync/client_id` (or the platform equivalent).
    ///
    /// Falls back to the data directory, then to the current directory.
    pub fn default_location() -> Self {
        let base = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(STATE_DIR_NAME).join(CLIENT_ID_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    fn get(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let id = content.trim();
                if id.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(id.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{}\n", id))?;
        Ok(())
    }
}
