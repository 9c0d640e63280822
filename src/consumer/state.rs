use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::backpressure::Strategy;
use crate::column::ViewportLayout;
use crate::orchestrator::Event;
use crate::types::{BatchSeq, PixelSize};
use crate::window::DataWindow;

/// Lifecycle status of the consumer-visible store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Streaming,
    Complete,
    Error,
}

/// `{ strategy, queueDepth, avgRenderMs }`, mirrored into every snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackpressureInfo {
    pub strategy: Strategy,
    pub queue_depth: usize,
    pub avg_render_ms: f64,
}

impl Default for BackpressureInfo {
    fn default() -> Self {
        Self {
            strategy: Strategy::Nominal,
            queue_depth: 0,
            avg_render_ms: 0.0,
        }
    }
}

/// Immutable consumer-visible snapshot. A new snapshot
/// replaces the old one on every dispatched mutation; observers compare by
/// reference rather than deep-equality on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    pub status: Status,
    pub layout: Option<ViewportLayout>,
    pub window: Option<DataWindow>,
    pub backpressure: BackpressureInfo,
    pub total_rows: u32,
    pub error: Option<String>,
    /// Consumer-measured row height; `0` means "unset, use `layout.rowHeight`".
    pub pitch: PixelSize,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            layout: None,
            window: None,
            backpressure: BackpressureInfo::default(),
            total_rows: 0,
            error: None,
            pitch: PixelSize::new(0.0),
        }
    }
}

/// Boxed observer callback, invoked synchronously after every state change.
pub type Listener = Box<dyn Fn(&Arc<StoreState>) + Send>;

/// Consumer-facing store: owns the immutable snapshot and fans it
/// out to subscribers synchronously after every mutation.
pub struct ConsumerStore {
    state: Mutex<Arc<StoreState>>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
}

impl Default for ConsumerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumerStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Arc::new(StoreState::default())),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn get_state(&self) -> Arc<StoreState> {
        Arc::clone(&self.state.lock().unwrap())
    }

    /// Registers `listener`, returning an id that [`Self::unsubscribe`]
    /// accepts to remove it.
    pub fn subscribe(&self, listener: Listener) -> u64 {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().unwrap().push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: u64) {
        self.listeners.lock().unwrap().retain(|(lid, _)| *lid != id);
    }

    pub fn set_status(&self, status: Status, error_message: Option<String>) {
        self.mutate(|state| {
            state.status = status;
            state.error = error_message;
        });
    }

    pub fn set_pitch(&self, pixels: PixelSize) {
        self.mutate(|state| state.pitch = pixels);
    }

    /// Applies one worker [`Event`] to the current snapshot.
    pub fn dispatch(&self, event: Event) {
        match event {
            Event::LayoutReady { layout } => self.mutate(move |state| state.layout = Some(layout)),
            Event::WindowUpdate { window } => {
                self.mutate(move |state| state.window = Some(window));
            }
            Event::Backpressure {
                strategy,
                queue_depth,
                avg_render_ms,
            } => self.mutate(move |state| {
                state.backpressure = BackpressureInfo {
                    strategy,
                    queue_depth,
                    avg_render_ms,
                };
            }),
            Event::TotalRowsUpdated { total_rows } => self.mutate(move |state| {
                // Suppressed (no new snapshot) if unchanged.
                if state.total_rows != total_rows {
                    state.total_rows = total_rows;
                    if let Some(layout) = &mut state.layout {
                        layout.total_rows = total_rows;
                        layout.total_height =
                            PixelSize::new(layout.row_height.get() * f64::from(total_rows));
                    }
                }
            }),
            Event::IngestError {
                seq,
                message,
                fatal,
            } => self.mutate(move |state| {
                state.error = Some(format_batch_message(seq, &message));
                if fatal {
                    state.status = Status::Error;
                }
            }),
            Event::IngestAck { .. } => {}
        }
    }

    fn mutate(&self, apply: impl FnOnce(&mut StoreState)) {
        let mut guard = self.state.lock().unwrap();
        let mut next = (**guard).clone();
        apply(&mut next);
        if next == **guard {
            return;
        }
        let next = Arc::new(next);
        *guard = Arc::clone(&next);
        drop(guard);
        for (_, listener) in self.listeners.lock().unwrap().iter() {
            listener(&next);
        }
    }
}

fn format_batch_message(seq: BatchSeq, message: &str) -> String {
    format!("Batch {}: {message}", seq.get())
}
