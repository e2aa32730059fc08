//! Diagnostics on stderr.
//!
//! Library code reports through `tracing`; user-facing output goes through
//! the `info!`/`success!`/`warning!`/`error!` macros on stdout. While a
//! progress bar is attached, diagnostic lines are printed above it instead of
//! through it.

use std::{
    io::{self, Write},
    sync::{Mutex, MutexGuard},
};

use indicatif::ProgressBar;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config;

static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init() {
    let filter =
        EnvFilter::try_new(config::log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(|| BarAwareWriter::new(io::stderr()))
        .with_target(false)
        .try_init();
}

/// Hides `pb` while diagnostics are written, until [`detach_progress_bar`].
pub fn attach_progress_bar(pb: &ProgressBar) {
    *active_bar() = Some(pb.clone());
}

pub fn detach_progress_bar() {
    active_bar().take();
}

pub fn progress_bar_attached() -> bool {
    active_bar().is_some()
}

fn active_bar() -> MutexGuard<'static, Option<ProgressBar>> {
    ACTIVE_BAR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Writer that suspends the attached progress bar around every write.
pub struct BarAwareWriter<W> {
    inner: W,
}

impl<W: Write> BarAwareWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for BarAwareWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // clone out so the lock is not held while the bar redraws
        let bar = active_bar().clone();
        match bar {
            Some(pb) => pb.suspend(|| self.inner.write_all(buf))?,
            None => self.inner.write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
