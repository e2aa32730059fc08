use chrono::{NaiveDate, Utc};
use tabled::Table;

use crate::{
    config, error, info, management::ArtistReleaseStore, types::ReleaseTableRow, utils,
};

/// Shows the releases stored by previous syncs.
pub async fn list_releases(artist: Option<String>, since: Option<NaiveDate>, upcoming: bool) {
    let store = match ArtistReleaseStore::load(config::store_path()).await {
        Ok(store) => store,
        Err(e) => error!("Cannot load release store. Err: {}", e),
    };

    let today = Utc::now().date_naive();
    let artist_filter = artist.map(|a| a.to_lowercase());

    let mut rows: Vec<ReleaseTableRow> = store
        .all()
        .into_iter()
        .filter(|a| {
            artist_filter
                .as_ref()
                .is_none_or(|term| a.name.to_lowercase().contains(term))
        })
        .flat_map(|a| {
            let artist_name = a.name;
            a.releases
                .into_iter()
                .filter(move |r| since.is_none_or(|s| r.date >= s))
                .filter(move |r| !upcoming || r.date > today)
                .map(move |r| ReleaseTableRow {
                    date: r.date.format("%Y-%m-%d").to_string(),
                    title: r.title,
                    artist: artist_name.clone(),
                    kind: r.kind.unwrap_or_default(),
                })
        })
        .collect();

    if rows.is_empty() {
        info!("No releases found. Run relsync sync to look for new ones.");
        return;
    }

    utils::sort_release_table_rows(&mut rows);
    let count = rows.len();
    let table = Table::new(rows);
    println!("{table}\n{count} releases");
}
