use byteorder::{ByteOrder, LittleEndian};

use crate::column::ColumnType;
use crate::error::{Error, Result, Stage};
use crate::wire::format::{BATCH_MAGIC, DESCRIPTOR_LEN, HEADER_LEN};

/// Parsed view over a wire buffer: a header plus one typed column view per
/// descriptor, all borrowing from the source buffer.
#[derive(Debug)]
pub struct ParsedBatch<'a> {
    pub seq: u32,
    pub row_count: u32,
    pub columns: Vec<ParsedColumn<'a>>,
}

/// A single parsed column's typed view over its slice of the source buffer.
#[derive(Debug)]
pub enum ParsedColumn<'a> {
    F64(AlignedF64<'a>),
    I32(AlignedI32<'a>),
    U32(AlignedU32<'a>),
    Bool(&'a [u8]),
    TimestampMs(AlignedF64<'a>),
    Utf8(ParsedUtf8<'a>),
    ListUtf8(ParsedListUtf8<'a>),
}

impl<'a> ParsedColumn<'a> {
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        match self {
            Self::F64(_) => ColumnType::F64,
            Self::I32(_) => ColumnType::I32,
            Self::U32(_) => ColumnType::U32,
            Self::Bool(_) => ColumnType::Bool,
            Self::TimestampMs(_) => ColumnType::TimestampMs,
            Self::Utf8(_) => ColumnType::Utf8,
            Self::ListUtf8(_) => ColumnType::ListUtf8,
        }
    }

    /// Raw little-endian bytes for a fixed-width numeric column. The store
    /// appends these directly: storage and wire layout are identical for
    /// numeric columns, so no decode/re-encode round trip is needed.
    #[must_use]
    pub const fn numeric_bytes(&self) -> Option<&'a [u8]> {
        match self {
            Self::F64(v) | Self::TimestampMs(v) => Some(v.bytes()),
            Self::I32(v) => Some(v.bytes()),
            Self::U32(v) => Some(v.bytes()),
            Self::Bool(bytes) => Some(bytes),
            Self::Utf8(_) | Self::ListUtf8(_) => None,
        }
    }
}

/// A typed view over an `f64` column's raw little-endian bytes.
///
/// The spec calls for "aligned typed views, copying if the source offset
/// is not aligned to the element size". Reading each element through
/// [`byteorder`]'s safe per-element accessors rather than casting the raw
/// pointer means no alignment requirement ever exists to violate, so no
/// copy is needed to satisfy it.
#[derive(Debug, Clone, Copy)]
pub struct AlignedF64<'a> {
    bytes: &'a [u8],
}

impl<'a> AlignedF64<'a> {
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.bytes
            .chunks_exact(8)
            .map(LittleEndian::read_f64)
            .collect()
    }

    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AlignedI32<'a> {
    bytes: &'a [u8],
}

impl<'a> AlignedI32<'a> {
    #[must_use]
    pub fn values(&self) -> Vec<i32> {
        self.bytes
            .chunks_exact(4)
            .map(LittleEndian::read_i32)
            .collect()
    }

    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AlignedU32<'a> {
    bytes: &'a [u8],
}

impl<'a> AlignedU32<'a> {
    #[must_use]
    pub fn values(&self) -> Vec<u32> {
        self.bytes
            .chunks_exact(4)
            .map(LittleEndian::read_u32)
            .collect()
    }

    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

#[derive(Debug)]
pub struct ParsedUtf8<'a> {
    pub offsets: Vec<u32>,
    pub bytes: &'a [u8],
}

#[derive(Debug)]
pub struct ParsedListUtf8<'a> {
    pub total_items: u32,
    pub row_offsets: Vec<u32>,
    pub item_offsets: Vec<u32>,
    pub bytes: &'a [u8],
}

fn need(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset.checked_add(len).ok_or(Error::Truncated {
        stage: Stage::Codec,
        needed: len,
        available: buf.len().saturating_sub(offset),
    })?;
    buf.get(offset..end).ok_or(Error::Truncated {
        stage: Stage::Codec,
        needed: len,
        available: buf.len().saturating_sub(offset),
    })
}

fn read_u32_vec(bytes: &[u8], count: usize) -> Vec<u32> {
    (0..count)
        .map(|i| LittleEndian::read_u32(&bytes[i * 4..i * 4 + 4]))
        .collect()
}

/// Parses a wire buffer into a [`ParsedBatch`].
///
/// # Errors
///
/// Returns [`Error::InvalidMagic`] if the header's leading word does not
/// match [`BATCH_MAGIC`](crate::wire::format::BATCH_MAGIC),
/// [`Error::UnknownTypeTag`] on an unrecognized column descriptor, and
/// [`Error::Truncated`] if any declared byte length runs past the buffer.
pub fn parse(buf: &[u8]) -> Result<ParsedBatch<'_>> {
    let header = need(buf, 0, HEADER_LEN)?;
    let magic = LittleEndian::read_u32(&header[0..4]);
    if magic != BATCH_MAGIC {
        return Err(Error::InvalidMagic { stage: Stage::Codec });
    }
    let seq = LittleEndian::read_u32(&header[4..8]);
    let row_count = LittleEndian::read_u32(&header[8..12]);
    let col_count = LittleEndian::read_u32(&header[12..16]);

    let descriptors_start = HEADER_LEN;
    let descriptors_len = col_count as usize * DESCRIPTOR_LEN;
    let descriptors = need(buf, descriptors_start, descriptors_len)?;

    let mut columns = Vec::with_capacity(col_count as usize);
    let mut data_offset = descriptors_start + descriptors_len;
    for i in 0..col_count as usize {
        let desc = &descriptors[i * DESCRIPTOR_LEN..i * DESCRIPTOR_LEN + DESCRIPTOR_LEN];
        let tag = LittleEndian::read_u32(&desc[0..4]);
        let byte_len = LittleEndian::read_u32(&desc[4..8]) as usize;
        let column_type = ColumnType::from_wire_tag(tag).ok_or(Error::UnknownTypeTag {
            stage: Stage::Codec,
            column_index: u32::try_from(i).unwrap_or(u32::MAX),
            tag,
        })?;
        let block = need(buf, data_offset, byte_len)?;
        columns.push(parse_column(column_type, block, row_count)?);
        data_offset += byte_len;
    }

    Ok(ParsedBatch {
        seq,
        row_count,
        columns,
    })
}

fn parse_column(column_type: ColumnType, block: &[u8], row_count: u32) -> Result<ParsedColumn<'_>> {
    Ok(match column_type {
        ColumnType::F64 => ParsedColumn::F64(parse_aligned_f64(block)),
        ColumnType::TimestampMs => ParsedColumn::TimestampMs(parse_aligned_f64(block)),
        ColumnType::I32 => ParsedColumn::I32(AlignedI32 { bytes: block }),
        ColumnType::U32 => ParsedColumn::U32(AlignedU32 { bytes: block }),
        ColumnType::Bool => ParsedColumn::Bool(block),
        ColumnType::Utf8 => ParsedColumn::Utf8(parse_utf8(block, row_count)?),
        ColumnType::ListUtf8 => ParsedColumn::ListUtf8(parse_list_utf8(block, row_count)?),
    })
}

const fn parse_aligned_f64(block: &[u8]) -> AlignedF64<'_> {
    AlignedF64 { bytes: block }
}

fn parse_utf8(block: &[u8], row_count: u32) -> Result<ParsedUtf8<'_>> {
    let offsets_len = (row_count as usize + 1) * 4;
    let offsets_bytes = need(block, 0, offsets_len)?;
    let offsets = read_u32_vec(offsets_bytes, row_count as usize + 1);
    let byte_len = *offsets.last().unwrap_or(&0) as usize;
    let bytes = need(block, offsets_len, byte_len)?;
    Ok(ParsedUtf8 { offsets, bytes })
}

fn parse_list_utf8(block: &[u8], row_count: u32) -> Result<ParsedListUtf8<'_>> {
    let header = need(block, 0, 4)?;
    let total_items = LittleEndian::read_u32(header);

    let row_offsets_start = 4;
    let row_offsets_len = (row_count as usize + 1) * 4;
    let row_offsets_bytes = need(block, row_offsets_start, row_offsets_len)?;
    let row_offsets = read_u32_vec(row_offsets_bytes, row_count as usize + 1);

    let item_offsets_start = row_offsets_start + row_offsets_len;
    let item_offsets_len = (total_items as usize + 1) * 4;
    let item_offsets_bytes = need(block, item_offsets_start, item_offsets_len)?;
    let item_offsets = read_u32_vec(item_offsets_bytes, total_items as usize + 1);

    let bytes_start = item_offsets_start + item_offsets_len;
    let byte_len = *item_offsets.last().unwrap_or(&0) as usize;
    let bytes = need(block, bytes_start, byte_len)?;

    Ok(ParsedListUtf8 {
        total_items,
        row_offsets,
        item_offsets,
        bytes,
    })
}
