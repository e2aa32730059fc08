//! Artists of the local music library.
//!
//! The library is expected to be laid out as `<root>/<Artist>/<Album>/<tracks>`,
//! which is what most taggers and rippers produce. Every visible directory
//! directly below the root is taken as one artist.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use async_trait::async_trait;

use crate::{error::InventoryError, sync::DeviceMusicService, types::Artist};

pub struct LibraryScanner {
    root: PathBuf,
}

impl LibraryScanner {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Artists sorted by name, case-insensitively.
    pub async fn scan(&self) -> Result<Vec<Artist>, InventoryError> {
        let metadata = match tokio::fs::metadata(&self.root).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(InventoryError::Missing(self.root.clone()));
            }
            Err(e) => return Err(InventoryError::Io(e)),
        };
        if !metadata.is_dir() {
            return Err(InventoryError::NotADirectory(self.root.clone()));
        }

        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut artists = Vec::new();
        let mut seen = HashSet::new();

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().trim().to_string();
            if name.is_empty() || name.starts_with('.') {
                continue;
            }
            if !entry.file_type().await?.is_dir() {
                continue;
            }

            let artist = Artist::new(name);
            // "Foo" and "foo" are the same artist
            if seen.insert(artist.id.clone()) {
                artists.push(artist);
            }
        }

        artists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(artists)
    }
}

#[async_trait]
impl DeviceMusicService for LibraryScanner {
    async fn list_artists(&self) -> Result<Vec<Artist>, InventoryError> {
        self.scan().await
    }
}
