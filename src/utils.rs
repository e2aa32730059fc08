use std::{cmp::Ordering, collections::HashSet, fmt::Write};

use chrono::{DateTime, NaiveDate, Utc};
use sha2::{Digest, Sha256};

use crate::types::{Release, ReleaseTableRow};

/// Stable identity key for an artist name.
///
/// Case and surrounding/inner whitespace are ignored, so "The  Cure" and
/// "the cure" map to the same key.
pub fn artist_key(name: &str) -> String {
    let normalized = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let hash = Sha256::digest(normalized.as_bytes());
    hash.iter().take(8).fold(String::new(), |mut out, b| {
        let _ = write!(out, "{:02x}", b);
        out
    })
}

/// Parses the catalog's partial dates (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`).
///
/// Partial dates resolve to the first day of their period.
pub fn parse_release_date(date: &str) -> Option<NaiveDate> {
    let mut parts = date.trim().splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(m) => m.parse::<u32>().ok()?,
        None => 1,
    };
    let day = match parts.next() {
        Some(d) => d.parse::<u32>().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn remove_duplicate_releases(releases: &mut Vec<Release>) {
    let mut seen_ids = HashSet::new();
    releases.retain(|release| seen_ids.insert(release.id.clone()));
}

pub fn sort_release_table_rows(rows: &mut Vec<ReleaseTableRow>) {
    rows.sort_by(|a, b| {
        match b.date.cmp(&a.date) {
            Ordering::Equal => a.artist.cmp(&b.artist), // secondary sort: artist ascending
            other => other,
        }
    });
}

/// Value parser for `YYYY-MM-DD` command line arguments.
pub fn parse_date_arg(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}', expected YYYY-MM-DD: {}", date, e))
}

pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "never".to_string(),
    }
}
