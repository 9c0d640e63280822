mod common;

use common::{demo_row, demo_schema};
use stability_engine::wire::{EncodedBatchStream, encode, parse};

#[test]
fn encode_then_parse_recovers_header_and_row_count() {
    let schema = demo_schema();
    let rows = vec![
        demo_row(1, 1.5, true, "alpha", &["x", "y"]),
        demo_row(2, 2.5, false, "beta", &[]),
    ];
    let buffer = encode(&schema, &rows, 7);

    let parsed = parse(&buffer).expect("buffer should parse");
    assert_eq!(parsed.seq, 7);
    assert_eq!(parsed.row_count, 2);
    assert_eq!(parsed.columns.len(), schema.len());
}

#[test]
fn missing_fields_coerce_per_column_type() {
    let schema = demo_schema();
    let mut sparse_row = std::collections::BTreeMap::new();
    sparse_row.insert(
        "id".to_owned(),
        stability_engine::wire::FieldValue::Number(3.0),
    );
    let buffer = encode(&schema, &[sparse_row], 0);
    let parsed = parse(&buffer).expect("buffer should parse");

    let stability_engine::wire::ParsedColumn::F64(values) = &parsed.columns[1] else {
        panic!("expected f64 column");
    };
    assert_eq!(values.values(), vec![0.0]);

    let stability_engine::wire::ParsedColumn::Utf8(utf8) = &parsed.columns[3] else {
        panic!("expected utf8 column");
    };
    assert_eq!(utf8.bytes, b"");
}

#[test]
fn truncated_buffer_is_rejected() {
    let schema = demo_schema();
    let rows = vec![demo_row(1, 1.0, true, "a", &[])];
    let mut buffer = encode(&schema, &rows, 0);
    buffer.truncate(buffer.len() - 1);

    let error = parse(&buffer).expect_err("truncated buffer must not parse");
    assert!(matches!(error, stability_engine::Error::Truncated { .. }));
}

#[test]
fn invalid_magic_is_rejected() {
    let schema = demo_schema();
    let mut buffer = encode(&schema, &[demo_row(1, 1.0, true, "a", &[])], 0);
    buffer[0] = buffer[0].wrapping_add(1);

    let error = parse(&buffer).expect_err("bad magic must not parse");
    assert!(matches!(error, stability_engine::Error::InvalidMagic { .. }));
}

#[test]
fn unknown_type_tag_is_rejected() {
    // Hand-build a one-column, zero-row buffer with a type tag outside the
    // closed set `ColumnType::from_wire_tag` understands.
    let mut buffer = Vec::new();
    buffer.extend_from_slice(&0xAC1D_C0DEu32.to_le_bytes()); // magic
    buffer.extend_from_slice(&0u32.to_le_bytes()); // seq
    buffer.extend_from_slice(&0u32.to_le_bytes()); // row_count
    buffer.extend_from_slice(&1u32.to_le_bytes()); // col_count
    buffer.extend_from_slice(&99u32.to_le_bytes()); // unknown type tag
    buffer.extend_from_slice(&0u32.to_le_bytes()); // byte_len

    let error = parse(&buffer).expect_err("unrecognized type tag must not parse");
    assert!(matches!(
        error,
        stability_engine::Error::UnknownTypeTag { tag: 99, column_index: 0, .. }
    ));
}

#[test]
fn stream_assigns_monotonic_sequence_numbers() {
    let schema = demo_schema();
    let mut batches = vec![
        vec![demo_row(1, 1.0, true, "a", &[])],
        vec![demo_row(2, 2.0, false, "b", &[])],
    ]
    .into_iter();

    let mut stream = EncodedBatchStream::new(&schema, move || batches.next().map(Ok));

    let first = parse(&stream.next().unwrap().unwrap()).unwrap();
    let second = parse(&stream.next().unwrap().unwrap()).unwrap();
    assert_eq!(first.seq, 0);
    assert_eq!(second.seq, 1);
    assert!(stream.next().is_none());
}
