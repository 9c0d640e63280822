use crate::backpressure::Strategy;
use crate::column::ViewportLayout;
use crate::types::BatchSeq;
use crate::window::DataWindow;

/// Events sent from the worker endpoint back to the main-side pump.
#[derive(Debug)]
pub enum Event {
    LayoutReady {
        layout: ViewportLayout,
    },
    /// `window.buffer` is moved: the worker no longer has access to it once
    /// this event is sent.
    WindowUpdate {
        window: DataWindow,
    },
    Backpressure {
        strategy: Strategy,
        queue_depth: usize,
        avg_render_ms: f64,
    },
    TotalRowsUpdated {
        total_rows: u32,
    },
    /// Not part of the wire-level event shape, which lists only `{ seq,
    /// message }`: `fatal` additionally tells the consumer store whether
    /// this error should transition `status` to `error` (only integrity
    /// violations and transport crashes do).
    /// It never crosses a process boundary, so it doesn't need to.
    IngestError {
        seq: BatchSeq,
        message: String,
        fatal: bool,
    },
    IngestAck {
        seq: BatchSeq,
    },
}
