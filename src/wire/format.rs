//! Constants and the column-type tag mapping shared by the encoder and
//! decoder so the two sides cannot drift out of sync.

use crate::column::ColumnType;

/// Leading 32-bit word of every valid wire buffer.
pub const BATCH_MAGIC: u32 = 0xAC1D_C0DE;

/// Size in bytes of the fixed batch header (`magic`, `seq`, `rowCount`, `colCount`).
pub const HEADER_LEN: usize = 16;

/// Size in bytes of one column descriptor (`typeTag`, `byteLen`).
pub const DESCRIPTOR_LEN: usize = 8;

/// Horizontal padding (in pixels) applied on both sides of a cell when a
/// column's width is derived from `maxContentChars`.
pub const CELL_H_PADDING: u32 = 16;

impl ColumnType {
    /// The wire-level numeric tag for this column type.
    #[must_use]
    pub const fn wire_tag(self) -> u32 {
        match self {
            Self::F64 => 0,
            Self::I32 => 1,
            Self::U32 => 2,
            Self::Bool => 3,
            Self::TimestampMs => 4,
            Self::Utf8 => 5,
            Self::ListUtf8 => 6,
        }
    }

    /// Resolves a wire-level tag back into a `ColumnType`, or `None` if the
    /// tag is not one of the closed set defined by the wire format.
    #[must_use]
    pub const fn from_wire_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::F64),
            1 => Some(Self::I32),
            2 => Some(Self::U32),
            3 => Some(Self::Bool),
            4 => Some(Self::TimestampMs),
            5 => Some(Self::Utf8),
            6 => Some(Self::ListUtf8),
            _ => None,
        }
    }

    /// Fixed per-row element width in bytes for the numeric column kinds;
    /// `None` for the variable-length `utf8`/`list_utf8` kinds.
    #[must_use]
    pub const fn fixed_elem_size(self) -> Option<usize> {
        match self {
            Self::F64 | Self::TimestampMs => Some(8),
            Self::I32 | Self::U32 => Some(4),
            Self::Bool => Some(1),
            Self::Utf8 | Self::ListUtf8 => None,
        }
    }
}
