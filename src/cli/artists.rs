use tabled::Table;

use crate::{
    config, error,
    library::LibraryScanner,
    management::ArtistReleaseStore,
    types::ArtistTableRow,
    warning,
};

/// Lists the artists of the local music library with what is stored for them.
pub async fn list_artists(search: Option<String>) {
    let library_dir = match config::music_library_dir() {
        Ok(dir) => dir,
        Err(e) => error!("{}", e),
    };

    let mut artists = match LibraryScanner::new(library_dir).scan().await {
        Ok(artists) => artists,
        Err(e) => error!("Cannot read music library. Err: {}", e),
    };

    if let Some(artist_search) = search {
        let search_term = artist_search.to_lowercase();
        artists.retain(|a| a.name.to_lowercase().contains(&search_term));
    }

    let store = match ArtistReleaseStore::load(config::store_path()).await {
        Ok(store) => Some(store),
        Err(e) => {
            warning!("Cannot load release store. Err: {}", e);
            None
        }
    };

    let table_rows: Vec<ArtistTableRow> = artists
        .into_iter()
        .map(|a| {
            let releases = store
                .as_ref()
                .and_then(|s| s.releases_for_artist(&a.id))
                .unwrap_or_default();
            ArtistTableRow {
                name: a.name,
                releases: releases.len(),
                latest: releases
                    .iter()
                    .max_by_key(|r| r.date)
                    .map(|r| format!("{} ({})", r.title, r.date.format("%Y-%m-%d")))
                    .unwrap_or_default(),
            }
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}
