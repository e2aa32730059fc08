use std::sync::{Arc, Mutex, MutexGuard};

use crate::{error::SyncFailure, types::Artist};

/// Receives progress of a sync run.
///
/// Every callback defaults to a no-op. Callbacks run synchronously on the
/// sync task, so a slow observer slows the run down.
pub trait ProgressObserver: Send + Sync {
    fn on_started(&self, _total: usize) {}

    /// One artist processed. `failure` is set when its lookup failed but the
    /// run goes on.
    fn on_progress(&self, _artist: &Artist, _index: usize, _failure: Option<&SyncFailure>) {}

    /// The run stopped. `artist` is `None` (and `index` 0) when it never got
    /// to the first artist.
    fn on_failed(
        &self,
        _artist: Option<&Artist>,
        _index: usize,
        _cause: &SyncFailure,
        _detail: Option<&str>,
    ) {
    }

    fn on_finished(&self, _success: bool) {}
}

/// Fans progress events out to every subscribed observer.
///
/// Cloning yields another handle to the same observer set, so observers can
/// be added or removed from elsewhere while a run is in progress.
#[derive(Clone, Default)]
pub struct ProgressChannel {
    observers: Arc<Mutex<Vec<Arc<dyn ProgressObserver>>>>,
}

impl ProgressChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer`. Subscribing the same observer twice is a no-op.
    pub fn subscribe(&self, observer: Arc<dyn ProgressObserver>) {
        let mut observers = self.lock();
        if !observers.iter().any(|o| same_observer(o, &observer)) {
            observers.push(observer);
        }
    }

    /// Returns `false` if `observer` was not subscribed.
    pub fn unsubscribe(&self, observer: &Arc<dyn ProgressObserver>) -> bool {
        let mut observers = self.lock();
        let before = observers.len();
        observers.retain(|o| !same_observer(o, observer));
        observers.len() != before
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn emit_started(&self, total: usize) {
        for observer in self.snapshot() {
            observer.on_started(total);
        }
    }

    pub fn emit_progress(&self, artist: &Artist, index: usize, failure: Option<&SyncFailure>) {
        for observer in self.snapshot() {
            observer.on_progress(artist, index, failure);
        }
    }

    pub fn emit_failed(
        &self,
        artist: Option<&Artist>,
        index: usize,
        cause: &SyncFailure,
        detail: Option<&str>,
    ) {
        for observer in self.snapshot() {
            observer.on_failed(artist, index, cause, detail);
        }
    }

    pub fn emit_finished(&self, success: bool) {
        for observer in self.snapshot() {
            observer.on_finished(success);
        }
    }

    // observers are called outside the lock so they may (un)subscribe themselves
    fn snapshot(&self) -> Vec<Arc<dyn ProgressObserver>> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn ProgressObserver>>> {
        self.observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn same_observer(a: &Arc<dyn ProgressObserver>, b: &Arc<dyn ProgressObserver>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
