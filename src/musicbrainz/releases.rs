use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{StatusCode, header};
use tokio::time::sleep;

use crate::{
    error::RemoteError,
    musicbrainz::MusicBrainzClient,
    sync::{RemoteMusicDatabase, SyncWindow},
    types::{Artist, MbRelease, Release, ReleaseSearchResponse},
    utils,
};

const MAX_ATTEMPTS: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);

/// Lucene query for releases credited to `artist_name` within `window`.
///
/// ```text
/// artist:"Nick Cave" AND date:[2024-01-01 TO *]
/// ```
pub fn build_release_query(artist_name: &str, window: &SyncWindow) -> String {
    let escaped = artist_name.replace('\\', "\\\\").replace('"', "\\\"");
    let mut query = format!("artist:\"{}\"", escaped);

    if !window.is_unbounded() {
        let bound = |ts: Option<DateTime<Utc>>| match ts {
            Some(ts) => ts.format("%Y-%m-%d").to_string(),
            None => "*".to_string(),
        };
        query.push_str(&format!(
            " AND date:[{start} TO {end}]",
            start = bound(window.start),
            end = bound(window.end)
        ));
    }
    query
}

/// Releases of one result page that belong to `artist` and fall inside `window`.
///
/// Editions of the same release group collapse into one release carrying the
/// group's id and the earliest date seen. The window applies to that date, so
/// a reissue of an older record is not a new release.
pub fn releases_from_page(
    artist: &Artist,
    page: &[MbRelease],
    window: &SyncWindow,
) -> Vec<Release> {
    let mut releases = credited_releases(artist, page);
    collapse_editions(&mut releases, window);
    releases
}

/// One release per edition credited to `artist`, dated by the group's first
/// release when the catalog knows it.
fn credited_releases(artist: &Artist, page: &[MbRelease]) -> Vec<Release> {
    page.iter()
        .filter(|r| {
            r.artist_credit.iter().any(|credit| {
                utils::artist_key(&credit.artist.name) == artist.id
                    || credit
                        .name
                        .as_deref()
                        .is_some_and(|name| utils::artist_key(name) == artist.id)
            })
        })
        .filter_map(|r| {
            let group = r.release_group.as_ref();
            let first_release = group
                .and_then(|g| g.first_release_date.as_deref())
                .and_then(utils::parse_release_date);
            let edition = r.date.as_deref().and_then(utils::parse_release_date);
            let date = match first_release.into_iter().chain(edition).min() {
                Some(date) => date,
                None => {
                    tracing::trace!(release = %r.title, "skipping release without usable date");
                    return None;
                }
            };

            Some(Release {
                id: group.map_or_else(|| r.id.clone(), |g| g.id.clone()),
                title: group
                    .and_then(|g| g.title.clone())
                    .unwrap_or_else(|| r.title.clone()),
                date,
                kind: group.and_then(|g| g.primary_type.clone()),
            })
        })
        .collect()
}

/// Keeps the earliest edition of each group, then drops groups dated outside
/// `window`.
fn collapse_editions(releases: &mut Vec<Release>, window: &SyncWindow) {
    releases.sort_by(|a, b| a.date.cmp(&b.date));
    utils::remove_duplicate_releases(releases);
    releases.retain(|r| window.contains(r.date));
}

impl MusicBrainzClient {
    async fn search_releases(
        &self,
        query: &str,
        offset: u64,
    ) -> Result<ReleaseSearchResponse, RemoteError> {
        let url = format!("{}/release", self.api_url);
        let limit = self.page_size.to_string();
        let offset = offset.to_string();
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.throttle().await;

            let response = self
                .client
                .get(&url)
                .query(&[
                    ("query", query),
                    ("fmt", "json"),
                    ("limit", limit.as_str()),
                    ("offset", offset.as_str()),
                ])
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS
                || status == StatusCode::SERVICE_UNAVAILABLE
            {
                let retry_after = response
                    .headers()
                    .get(header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or(1);
                if retry_after <= MAX_RETRY_AFTER_SECS && attempt < MAX_ATTEMPTS {
                    tracing::debug!(retry_after, attempt, "rate limited by MusicBrainz, waiting");
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                return Err(RemoteError::RateLimited { retry_after });
            }
            if status == StatusCode::BAD_GATEWAY && attempt < MAX_ATTEMPTS {
                sleep(BAD_GATEWAY_DELAY).await;
                continue; // retry
            }

            let response = response.error_for_status()?;
            let is_json = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("json"));
            if !is_json {
                return Err(RemoteError::Format(format!(
                    "expected JSON from {}, got {}",
                    url,
                    response
                        .headers()
                        .get(header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("no content type")
                )));
            }

            let body = response.text().await?;
            return Ok(serde_json::from_str::<ReleaseSearchResponse>(&body)?);
        }
    }
}

#[async_trait]
impl RemoteMusicDatabase for MusicBrainzClient {
    async fn find_releases(
        &self,
        artist: &Artist,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Option<Artist>, RemoteError> {
        let window = SyncWindow::new(start, end);
        let query = build_release_query(&artist.name, &window);

        let mut releases = Vec::new();
        let mut offset = 0;
        let mut pages = 0;

        loop {
            let page = self.search_releases(&query, offset).await?;
            pages += 1;
            if pages == 1 && page.count == 0 {
                return Ok(None);
            }

            let fetched = page.releases.len() as u64;
            releases.extend(credited_releases(artist, &page.releases));
            offset += fetched;

            if fetched == 0 || offset >= page.count {
                break;
            }
            if pages >= self.max_pages {
                tracing::warn!(
                    artist = %artist.name,
                    fetched = offset,
                    total = page.count,
                    "search results truncated at page limit"
                );
                break;
            }
        }

        // editions of one group can be spread over several pages
        collapse_editions(&mut releases, &window);
        Ok(Some(artist.with_releases(releases)))
    }
}
