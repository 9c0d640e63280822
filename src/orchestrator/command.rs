use crate::column::Schema;
use crate::types::{BatchSeq, Milliseconds, PixelSize, RowIndex, WindowSeq};

/// Commands sent from the main-side pump to the worker endpoint.
#[derive(Debug)]
pub enum Command {
    Init {
        schema: Vec<Schema>,
        char_width_hint: f64,
        row_height_hint: PixelSize,
        viewport_height: PixelSize,
    },
    /// `buffer` is moved, not borrowed: after sending, the pump no longer
    /// has access to it.
    Ingest {
        buffer: Vec<u8>,
        seq: BatchSeq,
    },
    SetWindow {
        start_row: RowIndex,
        row_count: u32,
    },
    ResizeViewport {
        height: PixelSize,
    },
    FrameAck {
        render_ms: Milliseconds,
        seq: WindowSeq,
    },
    Terminate,
}
