//! Compact little-endian columnar wire codec for fixed-width numerics,
//! variable-length UTF-8, and nested UTF-8 lists.

pub mod decode;
pub mod encode;
pub mod format;
pub mod stream;

pub use decode::{
    AlignedF64, AlignedI32, AlignedU32, ParsedBatch, ParsedColumn, ParsedListUtf8, ParsedUtf8,
    parse,
};
pub use encode::{FieldValue, Record, encode};
pub use format::{BATCH_MAGIC, CELL_H_PADDING, DESCRIPTOR_LEN, HEADER_LEN};
pub use stream::EncodedBatchStream;
