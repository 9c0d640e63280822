mod common;

use std::collections::BTreeMap;

use common::{demo_row, demo_schema};
use stability_engine::column::{CommitOutcome, Store};
use stability_engine::types::{PixelSize, RowIndex};
use stability_engine::wire::{encode, FieldValue};

#[test]
fn commit_appends_rows_and_reports_total() {
    let schema = demo_schema();
    let mut store = Store::new(schema.clone(), 7.0, PixelSize::new(24.0));

    let batch = encode(&schema, &[demo_row(1, 1.0, true, "a", &["x"])], 0);
    match store.commit(&batch) {
        CommitOutcome::Committed { total_rows } => assert_eq!(total_rows, 1),
        CommitOutcome::Rejected { error, .. } => panic!("unexpected rejection: {error}"),
    }

    let batch = encode(&schema, &[demo_row(2, 2.0, false, "b", &[])], 1);
    match store.commit(&batch) {
        CommitOutcome::Committed { total_rows } => assert_eq!(total_rows, 2),
        CommitOutcome::Rejected { error, .. } => panic!("unexpected rejection: {error}"),
    }

    assert_eq!(store.total_rows(), 2);
}

#[test]
fn schema_mismatch_rejects_without_mutating_store() {
    let schema = demo_schema();
    let mut store = Store::new(schema, 7.0, PixelSize::new(24.0));

    let mismatched_schema = vec![stability_engine::Schema::new(
        "id".to_owned(),
        stability_engine::ColumnType::F64,
        6,
    )];
    let batch = encode(&mismatched_schema, &[Default::default()], 0);

    match store.commit(&batch) {
        CommitOutcome::Rejected { error, fatal } => {
            assert!(!fatal);
            assert!(error.to_string().contains("Schema type mismatch"));
        }
        CommitOutcome::Committed { .. } => panic!("mismatched schema must not commit"),
    }
    assert_eq!(store.total_rows(), 0);
}

#[test]
fn sibling_list_utf8_columns_with_mismatched_row_item_counts_are_rejected() {
    // Two list_utf8 columns, one row: both end up with row_count == 1 (same
    // header-level row count), but row 0 holds 2 items in `tags_a` and only
    // 1 item in `tags_b`. `check_integrity`'s row-count comparison can't see
    // this; the per-row cross-check must.
    let schema = vec![
        stability_engine::Schema::new(
            "tags_a".to_owned(),
            stability_engine::ColumnType::ListUtf8,
            8,
        ),
        stability_engine::Schema::new(
            "tags_b".to_owned(),
            stability_engine::ColumnType::ListUtf8,
            8,
        ),
    ];
    let mut store = Store::new(schema.clone(), 7.0, PixelSize::new(24.0));

    let mut row = BTreeMap::new();
    row.insert(
        "tags_a".to_owned(),
        FieldValue::List(vec!["x".to_owned(), "y".to_owned()]),
    );
    row.insert("tags_b".to_owned(), FieldValue::List(vec!["x".to_owned()]));
    let batch = encode(&schema, &[row], 0);

    match store.commit(&batch) {
        CommitOutcome::Rejected { error, fatal } => {
            assert!(fatal);
            assert!(error.to_string().contains("item-count mismatch"));
        }
        CommitOutcome::Committed { .. } => {
            panic!("mismatched list_utf8 row item counts must not commit")
        }
    }
    assert_eq!(store.total_rows(), 0);
}

#[test]
fn slice_clamps_to_available_rows() {
    let schema = demo_schema();
    let mut store = Store::new(schema.clone(), 7.0, PixelSize::new(24.0));
    let batch = encode(
        &schema,
        &[
            demo_row(1, 1.0, true, "a", &[]),
            demo_row(2, 2.0, false, "b", &[]),
        ],
        0,
    );
    store.commit(&batch);

    assert_eq!(store.clamp_count(RowIndex::new(0), 10), 2);
    assert_eq!(store.clamp_count(RowIndex::new(1), 10), 1);
    assert_eq!(store.clamp_count(RowIndex::new(5), 10), 0);

    let sliced = store.slice_columns(RowIndex::new(1), 1);
    assert_eq!(sliced.len(), schema.len());
    let id_column = &sliced[0];
    assert_eq!(u32::from_le_bytes(id_column[0..4].try_into().unwrap()), 2);
}
