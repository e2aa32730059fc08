mod common;

use std::{
    sync::{Arc, Mutex},
    thread,
};

use common::{Event, RecordingObserver};
use relsync::{
    error::{InventoryError, SyncFailure},
    sync::{ProgressChannel, ProgressObserver},
    types::Artist,
};

fn as_dyn(observer: &Arc<RecordingObserver>) -> Arc<dyn ProgressObserver> {
    observer.clone()
}

fn inventory_failure() -> SyncFailure {
    SyncFailure::from(InventoryError::Missing("/nowhere".into()))
}

#[test]
fn test_every_observer_gets_every_event() {
    let channel = ProgressChannel::new();
    let first = RecordingObserver::new();
    let second = RecordingObserver::new();
    channel.subscribe(as_dyn(&first));
    channel.subscribe(as_dyn(&second));

    let artist = Artist::new("Alpha");
    channel.emit_started(1);
    channel.emit_progress(&artist, 1, None);
    channel.emit_finished(true);

    let expected = vec![
        Event::Started(1),
        Event::Progress {
            artist: "Alpha".to_string(),
            index: 1,
            failed: false,
        },
        Event::Finished(true),
    ];
    assert_eq!(first.events(), expected);
    assert_eq!(second.events(), expected);
}

#[test]
fn test_duplicate_subscribe_is_ignored() {
    let channel = ProgressChannel::new();
    let observer = RecordingObserver::new();
    channel.subscribe(as_dyn(&observer));
    channel.subscribe(as_dyn(&observer));

    assert_eq!(channel.len(), 1);

    channel.emit_started(3);
    assert_eq!(observer.events(), vec![Event::Started(3)]);
}

#[test]
fn test_unsubscribe() {
    let channel = ProgressChannel::new();
    let observer = RecordingObserver::new();
    let handle = as_dyn(&observer);

    // never subscribed
    assert!(!channel.unsubscribe(&handle));

    channel.subscribe(handle.clone());
    channel.emit_started(1);
    assert!(channel.unsubscribe(&handle));
    channel.emit_finished(true);

    assert_eq!(observer.events(), vec![Event::Started(1)]);
    assert!(channel.is_empty());
}

#[test]
fn test_clear_removes_everyone() {
    let channel = ProgressChannel::new();
    let first = RecordingObserver::new();
    let second = RecordingObserver::new();
    channel.subscribe(as_dyn(&first));
    channel.subscribe(as_dyn(&second));

    channel.clear();
    channel.emit_finished(false);

    assert!(channel.is_empty());
    assert!(first.events().is_empty());
    assert!(second.events().is_empty());
}

#[test]
fn test_failed_event_carries_detail() {
    let channel = ProgressChannel::new();
    let observer = RecordingObserver::new();
    channel.subscribe(as_dyn(&observer));

    channel.emit_failed(None, 0, &inventory_failure(), Some("no library"));

    assert_eq!(
        observer.events(),
        vec![Event::Failed {
            artist: None,
            index: 0,
            detail: Some("no library".to_string())
        }]
    );
}

#[test]
fn test_default_callbacks_are_no_ops() {
    struct Silent;
    impl ProgressObserver for Silent {}

    let channel = ProgressChannel::new();
    channel.subscribe(Arc::new(Silent));
    channel.emit_started(2);
    channel.emit_progress(&Artist::new("Alpha"), 1, Some(&inventory_failure()));
    channel.emit_finished(true);

    assert_eq!(channel.len(), 1);
}

/// Unsubscribes itself on the first progress event.
struct OneShot {
    channel: ProgressChannel,
    me: Mutex<Option<Arc<dyn ProgressObserver>>>,
    seen: Mutex<usize>,
}

impl ProgressObserver for OneShot {
    fn on_progress(&self, _artist: &Artist, _index: usize, _failure: Option<&SyncFailure>) {
        *self.seen.lock().unwrap() += 1;
        if let Some(me) = self.me.lock().unwrap().take() {
            self.channel.unsubscribe(&me);
        }
    }
}

#[test]
fn test_observer_can_unsubscribe_itself() {
    let channel = ProgressChannel::new();
    let one_shot = Arc::new(OneShot {
        channel: channel.clone(),
        me: Mutex::new(None),
        seen: Mutex::new(0),
    });
    let handle: Arc<dyn ProgressObserver> = one_shot.clone();
    *one_shot.me.lock().unwrap() = Some(handle.clone());
    channel.subscribe(handle);

    let artist = Artist::new("Alpha");
    channel.emit_progress(&artist, 1, None);
    channel.emit_progress(&artist, 2, None);

    assert_eq!(*one_shot.seen.lock().unwrap(), 1);
    assert!(channel.is_empty());
}

#[test]
fn test_subscribe_from_other_threads() {
    let channel = ProgressChannel::new();
    let observers: Vec<Arc<RecordingObserver>> = (0..8).map(|_| RecordingObserver::new()).collect();

    let handles: Vec<_> = observers
        .iter()
        .map(|observer| {
            let channel = channel.clone();
            let observer = as_dyn(observer);
            thread::spawn(move || channel.subscribe(observer))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(channel.len(), 8);
    channel.emit_started(5);
    for observer in &observers {
        assert_eq!(observer.events(), vec![Event::Started(5)]);
    }
}
