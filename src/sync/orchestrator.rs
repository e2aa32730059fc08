use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::SyncFailure,
    sync::{
        progress::ProgressChannel,
        traits::{
            ArtistStore, Clock, DeviceMusicService, PreferencesStore, RemoteMusicDatabase,
            SystemClock,
        },
        window::{SyncWindow, compute_window},
        worker::{ArtistOutcome, ArtistSyncWorker},
    },
};

const STORE_FAILURE_DETAIL: &str = "error writing to the release store";

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    FullSuccess {
        processed: usize,
    },
    /// Every artist was visited but some lookups failed. `failed_artist` and
    /// `cause` describe the last of them.
    PartialSuccess {
        processed: usize,
        failed: usize,
        failed_artist: String,
        cause: SyncFailure,
    },
    /// The run stopped early. `index` is 1-based, 0 when no artist was reached.
    FatalAbort {
        artist: Option<String>,
        index: usize,
        cause: SyncFailure,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::FatalAbort { .. })
    }
}

/// Drives a release sync over every artist of the local library.
///
/// Artists are processed one after the other in the order the library
/// returns them. Concurrent calls to [`ReleaseSync::run`] on the same
/// preferences are not guarded against; callers serialize them.
pub struct ReleaseSync {
    device: Arc<dyn DeviceMusicService>,
    worker: ArtistSyncWorker,
    preferences: Arc<dyn PreferencesStore>,
    progress: ProgressChannel,
    clock: Arc<dyn Clock>,
}

impl ReleaseSync {
    pub fn new(
        device: Arc<dyn DeviceMusicService>,
        remote: Arc<dyn RemoteMusicDatabase>,
        store: Arc<dyn ArtistStore>,
        preferences: Arc<dyn PreferencesStore>,
    ) -> Self {
        Self {
            device,
            worker: ArtistSyncWorker::new(remote, store),
            preferences,
            progress: ProgressChannel::new(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_progress(mut self, progress: ProgressChannel) -> Self {
        self.progress = progress;
        self
    }

    pub fn progress(&self) -> &ProgressChannel {
        &self.progress
    }

    /// The window the next run would use.
    pub fn window(&self) -> SyncWindow {
        let prefs = &self.preferences;
        compute_window(
            prefs.force_full_refresh() || prefs.full_update(),
            prefs.lookback_months(),
            prefs.last_refresh(),
            prefs.include_future_releases(),
            self.clock.now(),
        )
    }

    /// Whether a run is due: never refreshed, a full refresh is pending, or
    /// the scheduled next refresh has been reached.
    pub fn is_update_necessary(&self) -> bool {
        let prefs = &self.preferences;
        if prefs.last_refresh().is_none() || prefs.force_full_refresh() {
            return true;
        }
        prefs
            .next_refresh()
            .is_none_or(|next| next <= self.clock.now())
    }

    /// Runs only when [`ReleaseSync::is_update_necessary`] says so.
    ///
    /// A skipped run emits `finished(false)` and returns `None`.
    pub async fn run_if_necessary(&self) -> Option<RunOutcome> {
        if !self.is_update_necessary() {
            tracing::info!("release sync not due yet, skipping");
            self.progress.emit_finished(false);
            return None;
        }
        Some(self.run().await)
    }

    pub async fn run(&self) -> RunOutcome {
        let window = self.window();
        tracing::info!(start = ?window.start, end = ?window.end, "starting release sync");

        // stored as last refresh, so releases published during the run are
        // picked up next time
        let started_at = self.clock.now();

        let artists = match self.device.list_artists().await {
            Ok(artists) => artists,
            Err(e) => {
                tracing::error!(error = %e, "cannot list artists, aborting sync");
                let cause = SyncFailure::from(e);
                self.progress.emit_failed(None, 0, &cause, None);
                self.force_full_refresh_next_run().await;
                return RunOutcome::FatalAbort {
                    artist: None,
                    index: 0,
                    cause,
                };
            }
        };

        let total = artists.len();
        if total == 0 {
            tracing::warn!("no artists found, is there any music in the library?");
        }
        self.progress.emit_started(total);

        let mut failed = 0;
        let mut last_failure: Option<(String, SyncFailure)> = None;

        for (i, artist) in artists.into_iter().enumerate() {
            let index = i + 1;
            tracing::debug!(artist = %artist.name, index, total, "processing artist");

            match self.worker.process(&artist, &window).await {
                ArtistOutcome::Updated { .. } | ArtistOutcome::NoChange => {
                    self.progress.emit_progress(&artist, index, None);
                }
                ArtistOutcome::RecoverableFailure(cause) => {
                    self.progress.emit_progress(&artist, index, Some(&cause));
                    failed += 1;
                    last_failure = Some((artist.name, cause));
                }
                ArtistOutcome::StorageFailure(cause) => {
                    tracing::error!(
                        artist = %artist.name,
                        index,
                        "release store failed, cancelling sync"
                    );
                    self.progress.emit_failed(
                        Some(&artist),
                        index,
                        &cause,
                        Some(STORE_FAILURE_DETAIL),
                    );
                    return self.abort(artist.name, index, cause).await;
                }
                ArtistOutcome::Fatal(cause) => {
                    tracing::error!(
                        artist = %artist.name,
                        index,
                        "unexpected failure, cancelling sync"
                    );
                    self.progress.emit_failed(Some(&artist), index, &cause, None);
                    return self.abort(artist.name, index, cause).await;
                }
            }
        }

        self.record_checkpoint(started_at).await;
        self.progress.emit_finished(true);

        match last_failure {
            None => {
                tracing::info!(processed = total, "release sync finished");
                RunOutcome::FullSuccess { processed: total }
            }
            Some((failed_artist, cause)) => {
                tracing::warn!(processed = total, failed, "release sync finished with failures");
                RunOutcome::PartialSuccess {
                    processed: total,
                    failed,
                    failed_artist,
                    cause,
                }
            }
        }
    }

    async fn abort(&self, artist: String, index: usize, cause: SyncFailure) -> RunOutcome {
        self.force_full_refresh_next_run().await;
        RunOutcome::FatalAbort {
            artist: Some(artist),
            index,
            cause,
        }
    }

    // the last refresh timestamp can't be trusted after an abort
    async fn force_full_refresh_next_run(&self) {
        if let Err(e) = self.preferences.set_force_full_refresh(true).await {
            tracing::warn!(error = %e, "cannot store forced full refresh flag");
        }
    }

    // partial successes count as a checkpoint too
    async fn record_checkpoint(&self, started_at: DateTime<Utc>) {
        let prefs = &self.preferences;
        if let Err(e) = prefs.set_force_full_refresh(false).await {
            tracing::warn!(error = %e, "cannot clear forced full refresh flag");
        }
        if let Err(e) = prefs.set_last_refresh(started_at).await {
            tracing::warn!(error = %e, "cannot store last refresh timestamp");
        }
        let period = Duration::days(i64::from(prefs.refresh_period_days()));
        let next = started_at.checked_add_signed(period);
        if let Err(e) = prefs.set_next_refresh(next).await {
            tracing::warn!(error = %e, "cannot store next refresh timestamp");
        }
    }
}
