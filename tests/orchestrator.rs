mod common;

use std::time::Duration;

use common::{demo_row, demo_schema};
use stability_engine::options::EngineOptions;
use stability_engine::orchestrator::{BatchSource, Event};
use stability_engine::types::{Milliseconds, RowIndex};
use stability_engine::wire::encode;
use stability_engine::{Error, Result};

struct VecSource {
    batches: std::vec::IntoIter<Vec<u8>>,
}

impl BatchSource for VecSource {
    fn next_batch(&mut self) -> Option<Result<Vec<u8>>> {
        self.batches.next().map(Ok)
    }
}

#[test]
fn ingest_to_window_round_trip_over_real_threads() {
    let schema = demo_schema();
    let options = EngineOptions::new().with_viewport_height(stability_engine::types::PixelSize::new(480.0));
    let (mut pump, init, handle) = stability_engine::start(schema.clone(), options);
    pump.init(init);

    let mut source = VecSource {
        batches: vec![
            encode(&schema, &[demo_row(1, 1.0, true, "a", &[])], 0),
            encode(&schema, &[demo_row(2, 2.0, false, "b", &[])], 1),
        ]
        .into_iter(),
    };

    let mut layout_seen = false;
    let mut total_rows_seen = 0u32;
    pump.run(&mut source, |event| match event {
        Event::LayoutReady { .. } => layout_seen = true,
        Event::TotalRowsUpdated { total_rows } => total_rows_seen = total_rows,
        Event::IngestError { message, .. } => panic!("unexpected ingest error: {message}"),
        _ => {}
    })
    .expect("pump run should complete cleanly");

    assert!(layout_seen, "worker should emit LayoutReady after Init");
    assert_eq!(total_rows_seen, 2);

    pump.set_window(RowIndex::new(0), 2);
    pump.frame_ack(Milliseconds::new(5.0), stability_engine::types::BatchSeq::new(0));

    pump.terminate();
    drop(pump);
    handle.join().expect("worker thread should exit cleanly");
}

#[test]
fn abort_handle_stops_an_in_flight_pump() {
    let schema = demo_schema();
    let (mut pump, init, handle) = stability_engine::start(schema.clone(), EngineOptions::new());
    pump.init(init);

    let abort = pump.abort_handle();
    abort.abort();

    let mut source = VecSource {
        batches: vec![encode(&schema, &[demo_row(1, 1.0, true, "a", &[])], 0)].into_iter(),
    };
    let result = pump.run(&mut source, |_| {});
    assert!(matches!(result, Err(Error::Aborted)));

    pump.terminate();
    drop(pump);
    // give the worker a moment to drain before the test process exits.
    std::thread::sleep(Duration::from_millis(10));
    let _ = handle.join();
}
