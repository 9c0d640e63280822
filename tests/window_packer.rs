mod common;

use common::{demo_row, demo_schema};
use stability_engine::column::Store;
use stability_engine::types::{BatchSeq, PixelSize, RowIndex};
use stability_engine::wire::{encode, parse};
use stability_engine::window::pack;

#[test]
fn pack_produces_a_parseable_window_buffer() {
    let schema = demo_schema();
    let mut store = Store::new(schema.clone(), 7.0, PixelSize::new(24.0));
    let batch = encode(
        &schema,
        &[
            demo_row(1, 10.0, true, "alpha", &["a"]),
            demo_row(2, 20.0, false, "beta", &["b", "c"]),
            demo_row(3, 30.0, true, "gamma", &[]),
        ],
        0,
    );
    store.commit(&batch);

    let seq = BatchSeq::new(5);
    let window = pack(&store, RowIndex::new(1), 2, seq);
    let parsed = parse(&window).expect("window buffer must parse");

    assert_eq!(parsed.seq, 5);
    assert_eq!(parsed.row_count, 2);
    assert_eq!(parsed.columns.len(), schema.len());
}

#[test]
fn pack_clamps_an_out_of_range_window() {
    let schema = demo_schema();
    let mut store = Store::new(schema.clone(), 7.0, PixelSize::new(24.0));
    let batch = encode(&schema, &[demo_row(1, 1.0, true, "a", &[])], 0);
    store.commit(&batch);

    let window = pack(&store, RowIndex::new(0), 50, BatchSeq::new(0));
    let parsed = parse(&window).expect("window buffer must parse");
    assert_eq!(parsed.row_count, 1);
}
