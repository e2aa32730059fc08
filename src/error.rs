//! Error types shared by the sync core and its collaborators.
//!
//! Each collaborator reports through its own enum so the worker can classify
//! a failure by variant. A failed remote lookup is recoverable and a storage
//! failure stops the batch. Anything tagged `Unexpected` is fatal.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while listing artists from the local music library.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("music library not found at {0}")]
    Missing(PathBuf),
    #[error("music library path {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("cannot read music library: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while querying the remote metadata catalog.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("rate limited by remote catalog, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("cannot parse remote response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unexpected response format: {0}")]
    Format(String),
    #[error("unexpected remote failure: {0}")]
    Unexpected(String),
}

/// Failure while writing to the local release store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("release store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("release store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unexpected release store failure: {0}")]
    Unexpected(String),
}

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("cannot write preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode preferences: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot prepare data directory {0}: {1}")]
    DataDir(PathBuf, std::io::Error),
    #[error("cannot load environment file {0}: {1}")]
    EnvFile(PathBuf, dotenv::Error),
    #[error("no music library configured; set RELSYNC_MUSIC_DIR")]
    NoMusicDir,
}

/// The cause attached to failure progress events and run outcomes.
#[derive(Debug, Error)]
pub enum SyncFailure {
    #[error("cannot list artists from the music library: {0}")]
    Inventory(#[from] InventoryError),
    #[error("release lookup failed: {0}")]
    Remote(#[from] RemoteError),
    #[error("error writing to the release store: {0}")]
    Storage(#[from] StorageError),
}
