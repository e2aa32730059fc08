use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{error::SyncFailure, logging, sync::ProgressObserver, types::Artist};

/// Renders sync progress as a terminal progress bar.
///
/// The bar is attached to the diagnostics writer between `started` and the
/// terminal event, so log lines print above it.
pub struct ProgressBarObserver {
    pb: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// Renders into `pb`, restyled as a sync progress bar.
    pub fn with_bar(pb: ProgressBar) -> Self {
        pb.set_style(
            ProgressStyle::with_template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .progress_chars("=> "),
        );
        Self { pb }
    }
}

impl Default for ProgressBarObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_started(&self, total: usize) {
        self.pb.set_length(total as u64);
        self.pb.set_message("Looking for new releases...");
        self.pb.enable_steady_tick(Duration::from_millis(100));
        logging::attach_progress_bar(&self.pb);
    }

    fn on_progress(&self, artist: &Artist, _index: usize, failure: Option<&SyncFailure>) {
        if let Some(failure) = failure {
            self.pb.println(format!(
                "[{}] {}: {}",
                "!".yellow().bold(),
                artist.name,
                failure
            ));
        }
        self.pb.set_message(artist.name.clone());
        self.pb.inc(1);
    }

    fn on_failed(
        &self,
        artist: Option<&Artist>,
        index: usize,
        cause: &SyncFailure,
        detail: Option<&str>,
    ) {
        logging::detach_progress_bar();
        let message = match artist {
            Some(artist) => format!("Stopped at {} ({}): {}", artist.name, index, cause),
            None => format!("Stopped: {}", cause),
        };
        match detail {
            Some(detail) => self.pb.abandon_with_message(format!("{} ({})", message, detail)),
            None => self.pb.abandon_with_message(message),
        }
    }

    fn on_finished(&self, _success: bool) {
        logging::detach_progress_bar();
        self.pb.finish_and_clear();
    }
}
