use std::sync::Arc;

use crate::{
    cli::progress::ProgressBarObserver,
    config, error, info,
    library::LibraryScanner,
    management::{ArtistReleaseStore, PreferencesManager},
    musicbrainz::MusicBrainzClient,
    success,
    sync::{PreferencesStore, ProgressObserver, ReleaseSync, RunOutcome, SyncWindow},
    utils, warning,
};

/// Runs a release sync over the local music library.
///
/// `full` forces a full update regardless of the last refresh. With `if_due`
/// the sync only runs when the scheduled next refresh has been reached.
pub async fn sync(full: bool, if_due: bool) {
    let prefs = Arc::new(PreferencesManager::load(config::preferences_path()).await);
    if full {
        if let Err(e) = prefs.update(|p| p.force_full_refresh = true).await {
            warning!("Cannot force a full update. Err: {}", e);
        }
    }

    let library_dir = match config::music_library_dir() {
        Ok(dir) => dir,
        Err(e) => error!("{}", e),
    };
    let store = match ArtistReleaseStore::load(config::store_path()).await {
        Ok(store) => Arc::new(store),
        Err(e) => error!("Cannot load release store. Err: {}", e),
    };
    let remote = match MusicBrainzClient::new(&config::musicbrainz_api_url(), &config::user_agent())
    {
        Ok(client) => client,
        Err(e) => error!("Cannot create MusicBrainz client. Err: {}", e),
    };

    let releases_before = store.count_releases();
    let release_sync = ReleaseSync::new(
        Arc::new(LibraryScanner::new(library_dir.clone())),
        Arc::new(remote),
        store.clone(),
        prefs.clone(),
    );

    info!(
        "Looking for releases {} of artists in {}",
        describe_window(&release_sync.window()),
        library_dir.display()
    );

    let subscription: Arc<dyn ProgressObserver> = Arc::new(ProgressBarObserver::new());
    release_sync.progress().subscribe(subscription.clone());
    let outcome = if if_due {
        release_sync.run_if_necessary().await
    } else {
        Some(release_sync.run().await)
    };
    release_sync.progress().unsubscribe(&subscription);

    let Some(outcome) = outcome else {
        success!(
            "Releases are up to date. Next refresh: {}",
            utils::format_timestamp(prefs.next_refresh())
        );
        return;
    };

    let new_releases = store.count_releases().saturating_sub(releases_before);
    match outcome {
        RunOutcome::FullSuccess { processed } => success!(
            "Checked {} artists, {} new releases stored.",
            processed,
            new_releases
        ),
        RunOutcome::PartialSuccess {
            processed,
            failed,
            failed_artist,
            cause,
        } => warning!(
            "Checked {} artists, {} new releases stored. {} lookups failed, last one for {}: {}",
            processed,
            new_releases,
            failed,
            failed_artist,
            cause
        ),
        RunOutcome::FatalAbort {
            artist,
            index,
            cause,
        } => match artist {
            Some(artist) => error!(
                "Sync cancelled at artist {} ({}). The next sync will be a full update. Err: {}",
                artist,
                index,
                cause
            ),
            None => error!("Sync cancelled. Err: {}", cause),
        },
    }
}

fn describe_window(window: &SyncWindow) -> String {
    let day = |ts: chrono::DateTime<chrono::Utc>| ts.format("%Y-%m-%d").to_string();
    match (window.start, window.end) {
        (None, None) => "of all time".to_string(),
        (Some(start), None) => format!("since {} (including upcoming)", day(start)),
        (None, Some(end)) => format!("up to {}", day(end)),
        (Some(start), Some(end)) => format!("from {} to {}", day(start), day(end)),
    }
}
