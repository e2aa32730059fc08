use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;

use crate::{
    error::StorageError,
    sync::ArtistStore,
    types::{Artist, Release},
};

/// JSON file holding every artist with the releases found so far.
pub struct ArtistReleaseStore {
    path: PathBuf,
    artists: Mutex<Vec<Artist>>,
}

impl ArtistReleaseStore {
    pub fn new(path: PathBuf, artists: Option<Vec<Artist>>) -> Self {
        Self {
            path,
            artists: Mutex::new(artists.unwrap_or_default()),
        }
    }

    /// Loads the store at `path`; a missing file is an empty store.
    pub async fn load(path: PathBuf) -> Result<Self, StorageError> {
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::new(path, None));
            }
            Err(e) => return Err(StorageError::Io(e)),
        };
        let artists: Vec<Artist> = serde_json::from_str(&content)?;
        Ok(Self::new(path, Some(artists)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merges `artist` into the store, in memory only.
    ///
    /// Returns how many releases were new.
    pub fn merge(&self, artist: &Artist) -> Result<usize, StorageError> {
        if artist.id.is_empty() {
            return Err(StorageError::Unexpected(format!(
                "refusing to store artist '{}' without identity",
                artist.name
            )));
        }

        let mut artists = self.lock();
        match artists.iter_mut().find(|a| a.id == artist.id) {
            Some(stored) => Ok(merge_releases(&mut stored.releases, &artist.releases)),
            None => {
                let mut stored = artist.with_releases(Vec::new());
                let added = merge_releases(&mut stored.releases, &artist.releases);
                artists.push(stored);
                Ok(added)
            }
        }
    }

    pub async fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&*self.lock())?;
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        // write aside and rename so a crash never leaves half a file behind
        let tmp = self.path.with_extension("json.tmp");
        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    pub fn releases_for_artist(&self, artist_id: &str) -> Option<Vec<Release>> {
        self.lock()
            .iter()
            .find(|a| a.id == artist_id)
            .map(|a| a.releases.clone())
    }

    pub fn all(&self) -> Vec<Artist> {
        self.lock().clone()
    }

    pub fn count_artists(&self) -> usize {
        self.lock().len()
    }

    pub fn count_releases(&self) -> usize {
        self.lock().iter().map(|a| a.releases.len()).sum()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Artist>> {
        self.artists
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ArtistStore for ArtistReleaseStore {
    async fn save_or_update(&self, artist: &Artist) -> Result<(), StorageError> {
        let added = self.merge(artist)?;
        tracing::debug!(artist = %artist.name, added, "merged releases");
        self.persist().await
    }
}

/// Upserts `incoming` into `stored` by release id; returns the number appended.
///
/// An existing release keeps the earlier of both dates.
fn merge_releases(stored: &mut Vec<Release>, incoming: &[Release]) -> usize {
    let mut added = 0;
    for release in incoming {
        match stored.iter_mut().find(|r| r.id == release.id) {
            Some(existing) => {
                let date = existing.date.min(release.date);
                *existing = release.clone();
                existing.date = date;
            }
            None => {
                stored.push(release.clone());
                added += 1;
            }
        }
    }
    added
}
