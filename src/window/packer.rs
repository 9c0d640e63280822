use byteorder::{LittleEndian, WriteBytesExt};

use crate::column::Store;
use crate::types::{RowIndex, WindowSeq};
use crate::wire::format::{BATCH_MAGIC, DESCRIPTOR_LEN, HEADER_LEN};

/// Concatenates a store's column slices for `[start_row, start_row +
/// count)` into one contiguous wire buffer, framed with the same 16-byte
/// header and per-column descriptors as an encoded ingest batch.
///
/// `seq` is stamped into the header as the window's emission sequence, not
/// the ingest sequence that produced the underlying rows; the wire format
/// does not distinguish the two, it is simply "a batch".
#[must_use]
pub fn pack(store: &Store, start_row: RowIndex, count: usize, seq: WindowSeq) -> Vec<u8> {
    let actual_count = store.clamp_count(start_row, count);
    let blocks = store.slice_columns(start_row, actual_count);
    let schema = store.schema();

    let mut out = Vec::with_capacity(
        HEADER_LEN + schema.len() * DESCRIPTOR_LEN + blocks.iter().map(Vec::len).sum::<usize>(),
    );
    out.write_u32::<LittleEndian>(BATCH_MAGIC).unwrap();
    out.write_u32::<LittleEndian>(seq.get()).unwrap();
    out.write_u32::<LittleEndian>(u32::try_from(actual_count).expect("window too large"))
        .unwrap();
    out.write_u32::<LittleEndian>(u32::try_from(schema.len()).expect("too many columns"))
        .unwrap();

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
