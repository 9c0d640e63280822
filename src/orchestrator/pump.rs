use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::orchestrator::command::Command;
use crate::orchestrator::event::Event;
use crate::types::BatchSeq;

const ABORT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Supplies the main-side pump with one encoded wire buffer per call. An
/// in-memory `Vec`-backed source or [`crate::wire::EncodedBatchStream`] can
/// both implement this.
pub trait BatchSource {
    /// Returns the next wire buffer, or `None` when the source is
    /// exhausted, or propagates a producer error.
    fn next_batch(&mut self) -> Option<Result<Vec<u8>>>;
}

impl<F> BatchSource for F
where
    F: FnMut() -> Option<Result<Vec<u8>>>,
{
    fn next_batch(&mut self) -> Option<Result<Vec<u8>>> {
        self()
    }
}

/// Main-side pump: bounds in-flight ingest commands to exactly one
/// by awaiting each batch's ACK before advancing to the next.
pub struct Pump {
    cmd_tx: Sender<Command>,
    event_rx: Receiver<Event>,
    next_seq: BatchSeq,
    aborted: Arc<AtomicBool>,
}

impl Pump {
    #[must_use]
    pub fn new(cmd_tx: Sender<Command>, event_rx: Receiver<Event>) -> Self {
        Self {
            cmd_tx,
            event_rx,
            next_seq: BatchSeq::new(0),
            aborted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a handle that, when called, requests cancellation: the
    /// in-flight `run` call returns `Err(Error::Aborted)` at its next
    /// suspension point.
    #[must_use]
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            aborted: Arc::clone(&self.aborted),
        }
    }

    /// Drains `source` one batch at a time, forwarding every non-ACK event
    /// to `on_event` as it arrives. Returns once the source is exhausted,
    /// the pump is aborted, or the worker transport disconnects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aborted`] if cancelled via [`AbortHandle`], the
    /// producer's own error if `source` yields one, or
    /// [`Error::TransportCrash`] if the worker endpoint disconnects
    /// mid-flight.
    pub fn run<S, F>(&mut self, source: &mut S, mut on_event: F) -> Result<()>
    where
        S: BatchSource,
        F: FnMut(Event),
    {
        loop {
            if self.aborted.load(Ordering::Relaxed) {
                return Err(Error::Aborted);
            }
            let Some(batch) = source.next_batch() else {
                return Ok(());
            };
            let buffer = batch?;

            let seq = self.next_seq;
            self.next_seq = self.next_seq.next();

            if self.cmd_tx.send(Command::Ingest { buffer, seq }).is_err() {
                return Err(Error::TransportCrash {
                    details: "worker endpoint disconnected before ingest was sent".into(),
                });
            }

            self.await_ack(seq, &mut on_event)?;
        }
    }

    fn await_ack<F>(&mut self, seq: BatchSeq, on_event: &mut F) -> Result<()>
    where
        F: FnMut(Event),
    {
        loop {
            if self.aborted.load(Ordering::Relaxed) {
                return Err(Error::Aborted);
            }
            match self.event_rx.recv_timeout(ABORT_POLL_INTERVAL) {
                Ok(Event::IngestAck { seq: acked }) if acked == seq => return Ok(()),
                Ok(event) => on_event(event),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(Error::TransportCrash {
                        details: "worker endpoint disconnected while awaiting ACK".into(),
                    });
                }
            }
        }
    }

    /// Sends a controlled-shutdown command. Any ACKs the worker still owes
    /// for queued-but-uncommitted batches resolve rather than reject.
    pub fn terminate(&self) {
        let _ = self.cmd_tx.send(Command::Terminate);
    }

    /// Forwards a post-frame render-latency sample to the worker.
    pub fn frame_ack(&self, render_ms: crate::types::Milliseconds, seq: crate::types::WindowSeq) {
        let _ = self.cmd_tx.send(Command::FrameAck { render_ms, seq });
    }

    /// Requests a new visible row range directly, bypassing the scroll-to-
    /// window computation in [`Self::set_window_from_scroll`].
    pub fn set_window(&self, start_row: crate::types::RowIndex, row_count: u32) {
        let _ = self.cmd_tx.send(Command::SetWindow { start_row, row_count });
    }

    /// Requests a new visible row range computed from a scroll update, via
    /// [`crate::column::ViewportLayout::scroll_window`].
    pub fn set_window_from_scroll(
        &self,
        scroll_top: crate::types::PixelSize,
        pitch: crate::types::PixelSize,
        layout: &crate::column::ViewportLayout,
    ) {
        let (start_row, row_count) = layout.scroll_window(scroll_top, pitch);
        let _ = self.cmd_tx.send(Command::SetWindow { start_row, row_count });
    }

    /// Requests a viewport resize recompute.
    pub fn resize_viewport(&self, height: crate::types::PixelSize) {
        let _ = self.cmd_tx.send(Command::ResizeViewport { height });
    }

    /// Sends the initial schema and layout hints.
    pub fn init(&self, command: Command) {
        let _ = self.cmd_tx.send(command);
    }
}

/// Cooperative cancellation handle for [`Pump::run`].
#[derive(Clone)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }
}
