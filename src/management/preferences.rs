use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{error::PreferencesError, sync::PreferencesStore, types::Preferences};

/// Preferences kept in a JSON file, cached in memory.
pub struct PreferencesManager {
    path: PathBuf,
    prefs: Mutex<Preferences>,
}

impl PreferencesManager {
    pub fn new(path: PathBuf, prefs: Preferences) -> Self {
        Self {
            path,
            prefs: Mutex::new(prefs),
        }
    }

    /// Loads preferences from `path`. A missing or unreadable file yields the
    /// defaults, so a broken file never blocks a sync.
    pub async fn load(path: PathBuf) -> Self {
        let prefs = match async_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "invalid preferences, using defaults"
                );
                Preferences::default()
            }),
            Err(_) => Preferences::default(),
        };
        Self::new(path, prefs)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Preferences {
        self.lock().clone()
    }

    /// Applies `f` and writes the result to disk.
    pub async fn update<F>(&self, f: F) -> Result<(), PreferencesError>
    where
        F: FnOnce(&mut Preferences),
    {
        let json = {
            let mut prefs = self.lock();
            f(&mut prefs);
            serde_json::to_string_pretty(&*prefs)?
        };

        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Forgets every previous run, so the next one is a full update.
    pub async fn reset_bookkeeping(&self) -> Result<(), PreferencesError> {
        self.update(|prefs| {
            prefs.last_refresh = None;
            prefs.next_refresh = None;
            prefs.force_full_refresh = false;
        })
        .await
    }

    fn lock(&self) -> MutexGuard<'_, Preferences> {
        self.prefs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PreferencesStore for PreferencesManager {
    fn lookback_months(&self) -> i32 {
        self.lock().lookback_months
    }

    fn include_future_releases(&self) -> bool {
        self.lock().include_future_releases
    }

    fn full_update(&self) -> bool {
        self.lock().full_update
    }

    fn refresh_period_days(&self) -> u32 {
        self.lock().refresh_period_days
    }

    fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.lock().last_refresh
    }

    fn next_refresh(&self) -> Option<DateTime<Utc>> {
        self.lock().next_refresh
    }

    fn force_full_refresh(&self) -> bool {
        self.lock().force_full_refresh
    }

    async fn set_last_refresh(&self, at: DateTime<Utc>) -> Result<(), PreferencesError> {
        self.update(|prefs| prefs.last_refresh = Some(at)).await
    }

    async fn set_next_refresh(&self, at: Option<DateTime<Utc>>) -> Result<(), PreferencesError> {
        self.update(|prefs| prefs.next_refresh = at).await
    }

    async fn set_force_full_refresh(&self, force: bool) -> Result<(), PreferencesError> {
        self.update(|prefs| prefs.force_full_refresh = force).await
    }
}
