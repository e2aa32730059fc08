use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub releases: Vec<Release>,
}

impl Artist {
    /// Creates an artist without releases, keyed by its normalized name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: utils::artist_key(&name),
            name,
            releases: Vec::new(),
        }
    }

    /// Same identity, carrying the given releases.
    pub fn with_releases(&self, releases: Vec<Release>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            releases,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub kind: Option<String>,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub releases: usize,
    pub latest: String,
}

#[derive(Tabled)]
pub struct ReleaseTableRow {
    pub date: String,
    pub title: String,
    pub artist: String,
    pub kind: String,
}

#[derive(Tabled)]
pub struct PreferenceTableRow {
    pub key: String,
    pub value: String,
}

/// Result of `GET /ws/2/release?query=...&fmt=json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSearchResponse {
    pub count: u64,
    pub offset: u64,
    #[serde(default)]
    pub releases: Vec<MbRelease>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MbRelease {
    pub id: String,
    pub title: String,
    pub date: Option<String>,
    #[serde(rename = "release-group")]
    pub release_group: Option<MbReleaseGroup>,
    #[serde(rename = "artist-credit", default)]
    pub artist_credit: Vec<MbArtistCredit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MbReleaseGroup {
    pub id: String,
    pub title: Option<String>,
    #[serde(rename = "primary-type")]
    pub primary_type: Option<String>,
    #[serde(rename = "first-release-date", default)]
    pub first_release_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MbArtistCredit {
    pub name: Option<String>,
    pub artist: MbArtist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MbArtist {
    pub id: String,
    pub name: String,
}

/// User settings plus the bookkeeping written back after each run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub lookback_months: i32,
    pub include_future_releases: bool,
    pub full_update: bool,
    pub refresh_period_days: u32,
    pub last_refresh: Option<DateTime<Utc>>,
    pub next_refresh: Option<DateTime<Utc>>,
    pub force_full_refresh: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            lookback_months: 6,
            include_future_releases: true,
            full_update: false,
            refresh_period_days: 7,
            last_refresh: None,
            next_refresh: None,
            force_full_refresh: false,
        }
    }
}
