//! Window packer: produces a single contiguous payload for a
//! `[startRow, startRow+count)` range, ready for ownership transfer to a
//! consumer thread.

mod packer;

pub use packer::pack;

use crate::column::ViewportLayout;
use crate::types::{RowIndex, WindowSeq};

/// `{ seq, startRow, rowCount, layout, buffer }`.
/// Ephemeral: constructed on demand, ownership transferred to the
/// consumer, never retained by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DataWindow {
    pub seq: WindowSeq,
    pub start_row: RowIndex,
    pub row_count: u32,
    pub layout: ViewportLayout,
    pub buffer: Vec<u8>,
}
