use std::collections::BTreeMap;

use byteorder::{LittleEndian, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::column::{ColumnType, Schema};
use crate::wire::format::{BATCH_MAGIC, DESCRIPTOR_LEN, HEADER_LEN};

/// A single input value supplied by a producer before coercion into a
/// column's wire representation. Mirrors the loosely-typed record maps a
/// producer hands to the encoder.
///
/// `#[serde(untagged)]` lets `enginectl encode` read plain JSON values
/// (`null`, `true`, `12.5`, `"x"`, `["a", "b"]`) without a wrapper tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<String>),
}

impl FieldValue {
    fn truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
        }
    }

    fn as_number(&self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::Str(s) => s.parse().unwrap_or(0.0),
            Self::List(_) => 0.0,
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Str(s) => s.as_str(),
            _ => "",
        }
    }

    fn as_list(&self) -> &[String] {
        match self {
            Self::List(items) => items.as_slice(),
            _ => &[],
        }
    }
}

/// A row record: an unordered map from column name to input value. Only
/// names that appear in the schema are read; any other key is ignored.
pub type Record = BTreeMap<String, FieldValue>;

/// Encodes `rows` under `schema` into one contiguous wire buffer carrying
/// `seq` in its header.
///
/// Row values are coerced per column type: missing/null numeric becomes
/// `0`; non-boolean input to `bool` becomes `1` iff truthy; a missing
/// `utf8` becomes the empty string; non-list input to `list_utf8` becomes
/// an empty array; fractional input to an integer column truncates toward
/// zero.
#[must_use]
pub fn encode(schema: &[Schema], rows: &[Record], seq: u32) -> Vec<u8> {
    let row_count = u32::try_from(rows.len()).expect("row count overflow");
    let col_count = u32::try_from(schema.len()).expect("column count overflow");

    let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(schema.len());
    for column in schema {
        blocks.push(encode_column(column, rows));
    }

    let mut out = Vec::with_capacity(
        HEADER_LEN + schema.len() * DESCRIPTOR_LEN + blocks.iter().map(Vec::len).sum::<usize>(),
    );
    out.write_u32::<LittleEndian>(BATCH_MAGIC).unwrap();
    out.write_u32::<LittleEndian>(seq).unwrap();
    out.write_u32::<LittleEndian>(row_count).unwrap();
    out.write_u32::<LittleEndian>(col_count).unwrap();

    for (column, block) in schema.iter().zip(&blocks) {
        out.write_u32::<LittleEndian>(column.column_type.wire_tag())
            .unwrap();
        out.write_u32::<LittleEndian>(u32::try_from(block.len()).expect("column too large"))
            .unwrap();
    }
    for block in &blocks {
        out.extend_from_slice(block);
    }
    out
}

fn encode_column(column: &Schema, rows: &[Record]) -> Vec<u8> {
    match column.column_type {
        ColumnType::F64 | ColumnType::TimestampMs => {
            let mut buf = Vec::with_capacity(rows.len() * 8);
            for row in rows {
                let v = row.get(&column.name).map_or(0.0, FieldValue::as_number);
                buf.write_f64::<LittleEndian>(v).unwrap();
            }
            buf
        }
        ColumnType::I32 => {
            let mut buf = Vec::with_capacity(rows.len() * 4);
            for row in rows {
                let v = row.get(&column.name).map_or(0.0, FieldValue::as_number);
                #[allow(clippy::cast_possible_truncation)]
                buf.write_i32::<LittleEndian>(v.trunc() as i32).unwrap();
            }
            buf
        }
        ColumnType::U32 => {
            let mut buf = Vec::with_capacity(rows.len() * 4);
            for row in rows {
                let v = row.get(&column.name).map_or(0.0, FieldValue::as_number);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                buf.write_u32::<LittleEndian>(v.trunc().max(0.0) as u32)
                    .unwrap();
            }
            buf
        }
        ColumnType::Bool => rows
            .iter()
            .map(|row| u8::from(row.get(&column.name).is_some_and(FieldValue::truthy)))
            .collect(),
        ColumnType::Utf8 => encode_utf8(column, rows),
        ColumnType::ListUtf8 => encode_list_utf8(column, rows),
    }
}

fn encode_utf8(column: &Schema, rows: &[Record]) -> Vec<u8> {
    let mut offsets = Vec::with_capacity(rows.len() + 1);
    let mut bytes = Vec::new();
    offsets.push(0u32);
    for row in rows {
        let s = row.get(&column.name).map_or("", FieldValue::as_str);
        bytes.extend_from_slice(s.as_bytes());
        offsets.push(u32::try_from(bytes.len()).expect("utf8 column too large"));
    }
    let mut buf = Vec::with_capacity(offsets.len() * 4 + bytes.len());
    for offset in offsets {
        buf.write_u32::<LittleEndian>(offset).unwrap();
    }
    buf.extend_from_slice(&bytes);
    buf
}

fn encode_list_utf8(column: &Schema, rows: &[Record]) -> Vec<u8> {
    let mut row_offsets = Vec::with_capacity(rows.len() + 1);
    let mut item_offsets = Vec::new();
    let mut bytes = Vec::new();
    row_offsets.push(0u32);
    item_offsets.push(0u32);
    for row in rows {
        let items = row.get(&column.name).map_or(&[][..], FieldValue::as_list);
        for item in items {
            bytes.extend_from_slice(item.as_bytes());
            item_offsets.push(u32::try_from(bytes.len()).expect("list_utf8 column too large"));
        }
        row_offsets.push(u32::try_from(item_offsets.len() - 1).expect("list_utf8 too many items"));
    }
    let total_items = u32::try_from(item_offsets.len() - 1).expect("list_utf8 too many items");

    let mut buf = Vec::with_capacity(
        4 + row_offsets.len() * 4 + item_offsets.len() * 4 + bytes.len(),
    );
    buf.write_u32::<LittleEndian>(total_items).unwrap();
    for offset in row_offsets {
        buf.write_u32::<LittleEndian>(offset).unwrap();
    }
    for offset in item_offsets {
        buf.write_u32::<LittleEndian>(offset).unwrap();
    }
    buf.extend_from_slice(&bytes);
    buf
}
