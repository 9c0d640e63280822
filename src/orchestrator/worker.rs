use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};

use crate::backpressure::{BackpressureController, Strategy};
use crate::column::{CommitOutcome, Store};
use crate::logger::log_warn;
use crate::options::EngineOptions;
use crate::orchestrator::command::Command;
use crate::orchestrator::event::Event;
use crate::types::{BatchSeq, PixelSize, RowIndex, WindowSeq};
use crate::window::{DataWindow, pack};

/// Ingest endpoint (worker side): drains queued ingest commands one
/// at a time, applying the SHED eviction policy and the
/// NOMINAL/BUFFER/SHED update-coalescing rules, and emits events on `tx`.
pub struct Worker {
    store: Option<Store>,
    backpressure: BackpressureController,
    queue: VecDeque<(BatchSeq, Vec<u8>)>,
    current_window: Option<(RowIndex, u32)>,
    next_window_seq: WindowSeq,
    viewport_height: PixelSize,
    max_queue_depth: usize,
}

impl Default for Worker {
    fn default() -> Self {
        Self::new(&EngineOptions::new())
    }
}

impl Worker {
    #[must_use]
    pub fn new(options: &EngineOptions) -> Self {
        Self {
            store: None,
            backpressure: BackpressureController::with_thresholds(
                options.buffer_threshold_ms().get(),
                options.shed_threshold_ms().get(),
            ),
            queue: VecDeque::new(),
            current_window: None,
            next_window_seq: WindowSeq::new(0),
            viewport_height: PixelSize::new(0.0),
            max_queue_depth: options.max_queue_depth(),
        }
    }

    /// Runs the worker loop until the channel disconnects or `Terminate`
    /// is received. Blocking: intended to run on its own OS thread.
    pub fn run(mut self, rx: &Receiver<Command>, tx: &Sender<Event>) {
        while let Ok(command) = rx.recv() {
            match command {
                Command::Init {
                    schema,
                    char_width_hint,
                    row_height_hint,
                    viewport_height,
                } => {
                    self.viewport_height = viewport_height;
                    let store = Store::new(schema, char_width_hint, row_height_hint);
                    let layout = store.layout();
                    self.store = Some(store);
                    let _ = tx.send(Event::LayoutReady { layout });
                }
                Command::Ingest { buffer, seq } => {
                    self.enqueue(seq, buffer, tx);
                    self.drain_queue(tx);
                }
                Command::SetWindow { start_row, row_count } => {
                    self.current_window = Some((start_row, row_count));
                    self.emit_window(tx);
                }
                Command::ResizeViewport { height } => {
                    self.viewport_height = height;
                    if let Some(store) = &mut self.store {
                        store.set_viewport_height(height);
                    }
                }
                Command::FrameAck { render_ms, seq: _ } => {
                    if let Some(snapshot) =
                        self.backpressure.record_render(render_ms, self.queue.len())
                    {
                        let _ = tx.send(Event::Backpressure {
                            strategy: snapshot.strategy,
                            queue_depth: snapshot.queue_depth,
                            avg_render_ms: snapshot.avg_render_ms,
                        });
                    }
                }
                Command::Terminate => {
                    // Controlled shutdown: any queued-but-uncommitted
                    // ingest commands are resolved, not rejected.
                    for (seq, _) in self.queue.drain(..) {
                        let _ = tx.send(Event::IngestAck { seq });
                    }
                    return;
                }
            }
        }
    }

    fn enqueue(&mut self, seq: BatchSeq, buffer: Vec<u8>, tx: &Sender<Event>) {
        if self.backpressure.strategy() == Strategy::Shed && self.queue.len() >= self.max_queue_depth {
            if let Some((evicted_seq, _)) = self.queue.pop_front() {
                log_warn(&format!("shedding queued ingest batch {}", evicted_seq.get()));
                let _ = tx.send(Event::IngestError {
                    seq: evicted_seq,
                    message: "ingest batch shed under backpressure".to_owned(),
                    fatal: false,
                });
                let _ = tx.send(Event::IngestAck { seq: evicted_seq });
            }
        }
        self.queue.push_back((seq, buffer));
    }

    fn drain_queue(&mut self, tx: &Sender<Event>) {
        let coalesce = self.backpressure.strategy() != Strategy::Nominal;
        let mut committed_any = false;
        while let Some((seq, buffer)) = self.queue.pop_front() {
            self.commit_one(seq, &buffer, tx);
            committed_any = true;
            if !coalesce {
                self.emit_window(tx);
            }
        }
        if coalesce && committed_any {
            self.emit_window(tx);
        }
    }

    fn commit_one(&mut self, seq: BatchSeq, buffer: &[u8], tx: &Sender<Event>) {
        let Some(store) = &mut self.store else {
            let _ = tx.send(Event::IngestError {
                seq,
                message: "store not initialized".to_owned(),
                fatal: false,
            });
            let _ = tx.send(Event::IngestAck { seq });
            return;
        };

        match store.commit(buffer) {
            CommitOutcome::Committed { total_rows } => {
                let _ = tx.send(Event::TotalRowsUpdated { total_rows });
                let _ = tx.send(Event::IngestAck { seq });
            }
            CommitOutcome::Rejected { error, fatal } => {
                let _ = tx.send(Event::IngestError {
                    seq,
                    message: error.to_string(),
                    fatal,
                });
                let _ = tx.send(Event::IngestAck { seq });
            }
        }
    }

    fn emit_window(&mut self, tx: &Sender<Event>) {
        let Some((start_row, row_count)) = self.current_window else {
            return;
        };
        let Some(store) = &self.store else {
            return;
        };
        let seq = self.next_window_seq;
        self.next_window_seq = self.next_window_seq.next();
        let buffer = pack(store, start_row, row_count as usize, seq);
        let actual_rows = store.clamp_count(start_row, row_count as usize);
        let window = DataWindow {
            seq,
            start_row,
            row_count: u32::try_from(actual_rows).unwrap_or(u32::MAX),
            layout: store.layout(),
            buffer,
        };
        let _ = tx.send(Event::WindowUpdate { window });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Milliseconds;
    use std::sync::mpsc;

    fn worker_with_tiny_shed_queue() -> Worker {
        let options = EngineOptions::new()
            .with_max_queue_depth(2)
            .with_buffer_threshold_ms(Milliseconds::new(1.0))
            .with_shed_threshold_ms(Milliseconds::new(2.0));
        Worker::new(&options)
    }

    #[test]
    fn shed_strategy_evicts_the_oldest_queued_batch_once_full() {
        let mut worker = worker_with_tiny_shed_queue();
        for _ in 0..4 {
            worker.backpressure.record_render(Milliseconds::new(10.0), 0);
        }
        assert_eq!(worker.backpressure.strategy(), Strategy::Shed);

        let (tx, rx) = mpsc::channel();
        worker.enqueue(BatchSeq::new(0), vec![0], &tx);
        worker.enqueue(BatchSeq::new(1), vec![1], &tx);
        assert_eq!(worker.queue.len(), 2);
        assert!(rx.try_iter().next().is_none());

        worker.enqueue(BatchSeq::new(2), vec![2], &tx);
        assert_eq!(worker.queue.len(), 2);
        assert_eq!(worker.queue.front().unwrap().0, BatchSeq::new(1));
        assert_eq!(worker.queue.back().unwrap().0, BatchSeq::new(2));

        let events: Vec<Event> = rx.try_iter().collect();
        assert!(matches!(
            &events[0],
            Event::IngestError { seq, fatal: false, .. } if *seq == BatchSeq::new(0)
        ));
        assert!(matches!(&events[1], Event::IngestAck { seq } if *seq == BatchSeq::new(0)));
    }

    #[test]
    fn nominal_strategy_never_evicts_even_past_max_depth() {
        let mut worker = worker_with_tiny_shed_queue();
        let (tx, rx) = mpsc::channel();
        for i in 0..5 {
            worker.enqueue(BatchSeq::new(i), vec![], &tx);
        }
        assert_eq!(worker.queue.len(), 5);
        assert!(rx.try_iter().next().is_none());
    }
}
