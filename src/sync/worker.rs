use std::sync::Arc;

use crate::{
    error::{RemoteError, StorageError, SyncFailure},
    sync::{
        traits::{ArtistStore, RemoteMusicDatabase},
        window::SyncWindow,
    },
    types::Artist,
};

/// What happened to one artist.
#[derive(Debug)]
pub enum ArtistOutcome {
    /// New releases were found and stored.
    Updated { releases: usize },
    NoChange,
    /// The remote lookup failed; the batch can go on.
    RecoverableFailure(SyncFailure),
    /// The local store is unhealthy; the batch must stop.
    StorageFailure(SyncFailure),
    /// A failure nobody anticipated; the batch must stop.
    Fatal(SyncFailure),
}

/// Looks up and stores the releases of a single artist.
pub struct ArtistSyncWorker {
    remote: Arc<dyn RemoteMusicDatabase>,
    store: Arc<dyn ArtistStore>,
}

impl ArtistSyncWorker {
    pub fn new(remote: Arc<dyn RemoteMusicDatabase>, store: Arc<dyn ArtistStore>) -> Self {
        Self { remote, store }
    }

    pub async fn process(&self, artist: &Artist, window: &SyncWindow) -> ArtistOutcome {
        let found = match self
            .remote
            .find_releases(artist, window.start, window.end)
            .await
        {
            Ok(Some(found)) => found,
            Ok(None) => {
                tracing::warn!(artist = %artist.name, "artist not found in remote catalog");
                return ArtistOutcome::NoChange;
            }
            Err(RemoteError::Unexpected(msg)) => {
                tracing::error!(artist = %artist.name, error = %msg, "unexpected remote failure");
                return ArtistOutcome::Fatal(RemoteError::Unexpected(msg).into());
            }
            Err(e) => {
                // reported to the user through the progress event
                tracing::debug!(artist = %artist.name, error = %e, "release lookup failed");
                return ArtistOutcome::RecoverableFailure(e.into());
            }
        };

        if found.releases.is_empty() {
            tracing::debug!(artist = %artist.name, "no new releases");
            return ArtistOutcome::NoChange;
        }

        let count = found.releases.len();
        match self.store.save_or_update(&found).await {
            Ok(()) => {
                tracing::debug!(artist = %artist.name, releases = count, "stored releases");
                drop(found);
                ArtistOutcome::Updated { releases: count }
            }
            Err(StorageError::Unexpected(msg)) => {
                tracing::error!(artist = %artist.name, error = %msg, "unexpected store failure");
                ArtistOutcome::Fatal(StorageError::Unexpected(msg).into())
            }
            Err(e) => {
                tracing::error!(artist = %artist.name, error = %e, "cannot store releases");
                ArtistOutcome::StorageFailure(e.into())
            }
        }
    }
}
