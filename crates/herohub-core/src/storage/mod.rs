//! Durable client storage.
//!
//! A small string key-value store that survives restarts, used to keep the
//! session between runs. Backends:
//! - `FileStorage`: a JSON map in the cache directory (default)
//! - `KeychainStorage`: one OS keychain secret per key
//! - `MemoryStorage`: process-local, for tests and ephemeral sessions

pub mod file;
pub mod keychain;
pub mod memory;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use file::FileStorage;
pub use keychain::KeychainStorage;
pub use memory::MemoryStorage;

/// Key holding the bearer token string.
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-encoded user record.
pub const USER_KEY: &str = "user";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// String key-value store that persists across runs.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Which backend to persist the session with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    Keyring,
    Memory,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageKind::File),
            "keyring" | "keychain" => Ok(StorageKind::Keyring),
            "memory" => Ok(StorageKind::Memory),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

/// Open the configured backend. `dir` is only used by the file backend.
pub fn open(kind: StorageKind, dir: PathBuf) -> Arc<dyn Storage> {
    match kind {
        StorageKind::File => Arc::new(FileStorage::new(dir)),
        StorageKind::Keyring => Arc::new(KeychainStorage::new()),
        StorageKind::Memory => Arc::new(MemoryStorage::new()),
    }
}
