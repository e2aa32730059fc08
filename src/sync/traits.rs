use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::{InventoryError, PreferencesError, RemoteError, StorageError},
    types::Artist,
};

/// Source of the artists known locally (the music library on this device).
#[async_trait]
pub trait DeviceMusicService: Send + Sync {
    async fn list_artists(&self) -> Result<Vec<Artist>, InventoryError>;
}

/// Remote metadata catalog.
#[async_trait]
pub trait RemoteMusicDatabase: Send + Sync {
    /// Looks up releases of `artist` dated within `[start, end]`.
    ///
    /// `None` bounds are open. Returns `Ok(None)` when the catalog knows
    /// nothing about the artist, otherwise a copy of the artist carrying the
    /// releases found (possibly none).
    async fn find_releases(
        &self,
        artist: &Artist,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Option<Artist>, RemoteError>;
}

/// Persistent artist/release storage.
#[async_trait]
pub trait ArtistStore: Send + Sync {
    /// Inserts the artist or merges its releases into the stored one,
    /// keyed by artist id. Never duplicates a release.
    async fn save_or_update(&self, artist: &Artist) -> Result<(), StorageError>;
}

/// Settings and bookkeeping read at the start of a run and written at its end.
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    fn lookback_months(&self) -> i32;
    fn include_future_releases(&self) -> bool;
    fn full_update(&self) -> bool;
    fn refresh_period_days(&self) -> u32;
    fn last_refresh(&self) -> Option<DateTime<Utc>>;
    fn next_refresh(&self) -> Option<DateTime<Utc>>;
    fn force_full_refresh(&self) -> bool;

    async fn set_last_refresh(&self, at: DateTime<Utc>) -> Result<(), PreferencesError>;
    async fn set_next_refresh(&self, at: Option<DateTime<Utc>>) -> Result<(), PreferencesError>;
    async fn set_force_full_refresh(&self, force: bool) -> Result<(), PreferencesError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
