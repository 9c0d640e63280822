use std::sync::{Arc, Mutex};

use stability_engine::backpressure::Strategy;
use stability_engine::consumer::{ConsumerStore, Status};
use stability_engine::orchestrator::Event;
use stability_engine::types::BatchSeq;

#[test]
fn total_rows_updated_is_suppressed_when_unchanged() {
    let store = ConsumerStore::new();
    let notifications = Arc::new(Mutex::new(0usize));
    let counted = Arc::clone(&notifications);
    store.subscribe(Box::new(move |_| {
        *counted.lock().unwrap() += 1;
    }));

    store.dispatch(Event::TotalRowsUpdated { total_rows: 10 });
    assert_eq!(*notifications.lock().unwrap(), 1);

    store.dispatch(Event::TotalRowsUpdated { total_rows: 10 });
    assert_eq!(*notifications.lock().unwrap(), 1, "no new snapshot for an unchanged value");

    store.dispatch(Event::TotalRowsUpdated { total_rows: 11 });
    assert_eq!(*notifications.lock().unwrap(), 2);
}

#[test]
fn fatal_ingest_error_transitions_to_error_status() {
    let store = ConsumerStore::new();
    store.dispatch(Event::IngestError {
        seq: BatchSeq::new(3),
        message: "integrity violation".to_owned(),
        fatal: true,
    });
    let state = store.get_state();
    assert_eq!(state.status, Status::Error);
    assert!(state.error.as_deref().unwrap().contains("integrity violation"));
}

#[test]
fn non_fatal_ingest_error_does_not_change_status() {
    let store = ConsumerStore::new();
    store.set_status(Status::Streaming, None);
    store.dispatch(Event::IngestError {
        seq: BatchSeq::new(1),
        message: "schema mismatch".to_owned(),
        fatal: false,
    });
    let state = store.get_state();
    assert_eq!(state.status, Status::Streaming);
}

#[test]
fn backpressure_event_updates_the_snapshot() {
    let store = ConsumerStore::new();
    store.dispatch(Event::Backpressure {
        strategy: Strategy::Shed,
        queue_depth: 64,
        avg_render_ms: 33.0,
    });
    let state = store.get_state();
    assert_eq!(state.backpressure.strategy, Strategy::Shed);
    assert_eq!(state.backpressure.queue_depth, 64);
}

#[test]
fn unsubscribe_stops_further_notifications() {
    let store = ConsumerStore::new();
    let count = Arc::new(Mutex::new(0usize));
    let counted = Arc::clone(&count);
    let id = store.subscribe(Box::new(move |_| {
        *counted.lock().unwrap() += 1;
    }));

    store.dispatch(Event::TotalRowsUpdated { total_rows: 1 });
    store.unsubscribe(id);
    store.dispatch(Event::TotalRowsUpdated { total_rows: 2 });

    assert_eq!(*count.lock().unwrap(), 1);
}
