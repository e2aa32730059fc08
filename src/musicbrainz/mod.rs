//! # MusicBrainz Integration Module
//!
//! Remote metadata catalog used by the release sync. Artists of the local
//! library are looked up by name through the MusicBrainz search API
//! (`/ws/2/release`), restricted to the sync window's date range.
//!
//! ## Etiquette
//!
//! MusicBrainz asks clients to send a meaningful `User-Agent` and to stay at
//! or below one request per second. The client enforces a minimum delay
//! between requests and backs off on `429`/`503` responses according to the
//! `Retry-After` header.
//!
//! ## Errors
//!
//! Network failures and malformed responses are reported as recoverable
//! [`RemoteError`]s, as is rate limiting that lasts too long. A single artist
//! can fail without cancelling the whole sync.

mod releases;

use std::{sync::Mutex, time::Duration};

use reqwest::Client;
use tokio::time::{Instant, sleep};

use crate::error::RemoteError;

pub use releases::build_release_query;
pub use releases::releases_from_page;

const DEFAULT_PAGE_SIZE: u32 = 100;
const DEFAULT_MAX_PAGES: u32 = 5;
const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1100);

pub struct MusicBrainzClient {
    client: Client,
    api_url: String,
    page_size: u32,
    max_pages: u32,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl MusicBrainzClient {
    pub fn new(api_url: &str, user_agent: &str) -> Result<Self, RemoteError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            request_delay: DEFAULT_REQUEST_DELAY,
            last_request: Mutex::new(None),
        })
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, 100);
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Waits until at least `request_delay` passed since the previous request.
    async fn throttle(&self) {
        let wait = {
            let mut last = self
                .last_request
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let now = Instant::now();
            let wait = last
                .map(|at| (at + self.request_delay).saturating_duration_since(now))
                .unwrap_or_default();
            *last = Some(now + wait);
            wait
        };

        if !wait.is_zero() {
            sleep(wait).await;
        }
    }
}
