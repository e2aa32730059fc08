#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicI64, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use relsync::{
    error::{InventoryError, PreferencesError, RemoteError, StorageError, SyncFailure},
    sync::{
        ArtistStore, Clock, DeviceMusicService, PreferencesStore, ProgressObserver,
        RemoteMusicDatabase, SyncWindow,
    },
    types::{Artist, Preferences, Release},
};

pub fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn release(id: &str, title: &str, date: (i32, u32, u32)) -> Release {
    Release {
        id: id.to_string(),
        title: title.to_string(),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        kind: Some("Album".to_string()),
    }
}

// ---------------------------------------------------------------- device

pub struct FakeDevice {
    artists: Mutex<Option<Vec<Artist>>>,
    pub calls: Mutex<usize>,
}

impl FakeDevice {
    pub fn with_artists(names: &[&str]) -> Self {
        Self {
            artists: Mutex::new(Some(names.iter().map(|n| Artist::new(*n)).collect())),
            calls: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            artists: Mutex::new(None),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl DeviceMusicService for FakeDevice {
    async fn list_artists(&self) -> Result<Vec<Artist>, InventoryError> {
        *self.calls.lock().unwrap() += 1;
        match self.artists.lock().unwrap().clone() {
            Some(artists) => Ok(artists),
            None => Err(InventoryError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "no access to media",
            ))),
        }
    }
}

// ---------------------------------------------------------------- remote

#[derive(Clone)]
pub enum Script {
    Releases(Vec<Release>),
    NotFound,
    RateLimited,
    Unexpected,
}

/// Remote catalog answering from a script keyed by artist name. Releases are
/// filtered by the requested window, like the real catalog does.
#[derive(Default)]
pub struct FakeRemote {
    scripts: Mutex<HashMap<String, Script>>,
    pub queried: Mutex<Vec<String>>,
    pub windows: Mutex<Vec<SyncWindow>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, artist: &str, script: Script) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(artist.to_string(), script);
        self
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }

    pub fn last_window(&self) -> Option<SyncWindow> {
        self.windows.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl RemoteMusicDatabase for FakeRemote {
    async fn find_releases(
        &self,
        artist: &Artist,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Option<Artist>, RemoteError> {
        let window = SyncWindow::new(start, end);
        self.queried.lock().unwrap().push(artist.name.clone());
        self.windows.lock().unwrap().push(window);

        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(&artist.name)
            .cloned()
            .unwrap_or(Script::Releases(Vec::new()));

        match script {
            Script::Releases(releases) => Ok(Some(
                artist.with_releases(
                    releases
                        .into_iter()
                        .filter(|r| window.contains(r.date))
                        .collect(),
                ),
            )),
            Script::NotFound => Ok(None),
            Script::RateLimited => Err(RemoteError::RateLimited { retry_after: 3600 }),
            Script::Unexpected => Err(RemoteError::Unexpected("catalog exploded".to_string())),
        }
    }
}

// ---------------------------------------------------------------- store

/// Store that rejects any release it has already seen for an artist.
#[derive(Default)]
pub struct FakeStore {
    pub saved: Mutex<HashMap<String, Vec<Release>>>,
    pub saves: Mutex<Vec<String>>,
    fail_on: Mutex<Option<String>>,
    unexpected_on: Mutex<Option<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(self, artist: &str) -> Self {
        *self.fail_on.lock().unwrap() = Some(artist.to_string());
        self
    }

    pub fn unexpected_on(self, artist: &str) -> Self {
        *self.unexpected_on.lock().unwrap() = Some(artist.to_string());
        self
    }

    pub fn release_count(&self) -> usize {
        self.saved.lock().unwrap().values().map(|r| r.len()).sum()
    }

    pub fn saves(&self) -> Vec<String> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtistStore for FakeStore {
    async fn save_or_update(&self, artist: &Artist) -> Result<(), StorageError> {
        self.saves.lock().unwrap().push(artist.name.clone());

        if self.fail_on.lock().unwrap().as_deref() == Some(artist.name.as_str()) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        if self.unexpected_on.lock().unwrap().as_deref() == Some(artist.name.as_str()) {
            return Err(StorageError::Unexpected("index corrupted".to_string()));
        }

        let mut saved = self.saved.lock().unwrap();
        let stored = saved.entry(artist.id.clone()).or_default();
        for release in &artist.releases {
            if stored.iter().any(|r| r.id == release.id) {
                return Err(StorageError::Unexpected(format!(
                    "duplicate release {}",
                    release.id
                )));
            }
        }
        stored.extend(artist.releases.iter().cloned());
        Ok(())
    }
}

// ---------------------------------------------------------------- preferences

#[derive(Default)]
pub struct FakePreferences {
    pub prefs: Mutex<Preferences>,
    pub fail_writes: Mutex<bool>,
    pub force_writes: Mutex<Vec<bool>>,
}

impl FakePreferences {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            prefs: Mutex::new(prefs),
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> Preferences {
        self.prefs.lock().unwrap().clone()
    }

    pub fn force_writes(&self) -> Vec<bool> {
        self.force_writes.lock().unwrap().clone()
    }

    fn commit(&self) -> Result<(), PreferencesError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(PreferencesError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "read-only",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PreferencesStore for FakePreferences {
    fn lookback_months(&self) -> i32 {
        self.prefs.lock().unwrap().lookback_months
    }

    fn include_future_releases(&self) -> bool {
        self.prefs.lock().unwrap().include_future_releases
    }

    fn full_update(&self) -> bool {
        self.prefs.lock().unwrap().full_update
    }

    fn refresh_period_days(&self) -> u32 {
        self.prefs.lock().unwrap().refresh_period_days
    }

    fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.prefs.lock().unwrap().last_refresh
    }

    fn next_refresh(&self) -> Option<DateTime<Utc>> {
        self.prefs.lock().unwrap().next_refresh
    }

    fn force_full_refresh(&self) -> bool {
        self.prefs.lock().unwrap().force_full_refresh
    }

    async fn set_last_refresh(&self, at: DateTime<Utc>) -> Result<(), PreferencesError> {
        self.commit()?;
        self.prefs.lock().unwrap().last_refresh = Some(at);
        Ok(())
    }

    async fn set_next_refresh(&self, at: Option<DateTime<Utc>>) -> Result<(), PreferencesError> {
        self.commit()?;
        self.prefs.lock().unwrap().next_refresh = at;
        Ok(())
    }

    async fn set_force_full_refresh(&self, force: bool) -> Result<(), PreferencesError> {
        self.force_writes.lock().unwrap().push(force);
        self.commit()?;
        self.prefs.lock().unwrap().force_full_refresh = force;
        Ok(())
    }
}

// ---------------------------------------------------------------- clock

/// Each call returns a time one minute later than the previous one.
pub struct SteppingClock {
    base: DateTime<Utc>,
    calls: AtomicI64,
}

impl SteppingClock {
    pub fn new(base: DateTime<Utc>) -> Self {
        Self {
            base,
            calls: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.base + Duration::minutes(n)
    }
}

// ---------------------------------------------------------------- observer

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Started(usize),
    Progress {
        artist: String,
        index: usize,
        failed: bool,
    },
    Failed {
        artist: Option<String>,
        index: usize,
        detail: Option<String>,
    },
    Finished(bool),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Progress { .. }))
            .count()
    }
}

impl ProgressObserver for RecordingObserver {
    fn on_started(&self, total: usize) {
        self.events.lock().unwrap().push(Event::Started(total));
    }

    fn on_progress(&self, artist: &Artist, index: usize, failure: Option<&SyncFailure>) {
        self.events.lock().unwrap().push(Event::Progress {
            artist: artist.name.clone(),
            index,
            failed: failure.is_some(),
        });
    }

    fn on_failed(
        &self,
        artist: Option<&Artist>,
        index: usize,
        _cause: &SyncFailure,
        detail: Option<&str>,
    ) {
        self.events.lock().unwrap().push(Event::Failed {
            artist: artist.map(|a| a.name.clone()),
            index,
            detail: detail.map(str::to_string),
        });
    }

    fn on_finished(&self, success: bool) {
        self.events.lock().unwrap().push(Event::Finished(success));
    }
}
