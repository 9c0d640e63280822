use crate::types::Milliseconds;

/// Number of render-latency samples the controller retains.
pub const SAMPLE_CAPACITY: usize = 8;

/// Minimum sample count before a mean is considered significant enough to
/// drive a strategy transition.
const MIN_SAMPLES_FOR_DECISION: usize = 4;

/// Maximum number of commands the worker's ingest queue retains before
/// SHED starts evicting the oldest one.
pub const MAX_QUEUE_DEPTH: usize = 64;

/// Default mean render latency above which the controller sheds queued
/// ingest batches, overridable via [`crate::EngineOptions`].
pub const DEFAULT_SHED_THRESHOLD_MS: f64 = 28.0;
/// Default mean render latency above which the controller starts
/// coalescing window updates instead of emitting one per commit.
pub const DEFAULT_BUFFER_THRESHOLD_MS: f64 = 14.0;

/// Backpressure strategy the orchestrator is currently operating under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Nominal,
    Buffer,
    Shed,
}

/// Snapshot carried by a `BACKPRESSURE` event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackpressureSnapshot {
    pub strategy: Strategy,
    pub queue_depth: usize,
    pub avg_render_ms: f64,
}

/// Tracks a rolling mean of the last [`SAMPLE_CAPACITY`] render-latency
/// samples and transitions between [`Strategy`] variants on that mean.
/// Emits a snapshot only when the strategy actually changes.
pub struct BackpressureController {
    samples: Vec<Milliseconds>,
    next_slot: usize,
    strategy: Strategy,
    buffer_threshold_ms: f64,
    shed_threshold_ms: f64,
}

impl Default for BackpressureController {
    fn default() -> Self {
        Self::new()
    }
}

impl BackpressureController {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_thresholds(DEFAULT_BUFFER_THRESHOLD_MS, DEFAULT_SHED_THRESHOLD_MS)
    }

    #[must_use]
    pub const fn with_thresholds(buffer_threshold_ms: f64, shed_threshold_ms: f64) -> Self {
        Self {
            samples: Vec::new(),
            next_slot: 0,
            strategy: Strategy::Nominal,
            buffer_threshold_ms,
            shed_threshold_ms,
        }
    }

    fn classify(&self, mean_ms: f64) -> Strategy {
        if mean_ms > self.shed_threshold_ms {
            Strategy::Shed
        } else if mean_ms > self.buffer_threshold_ms {
            Strategy::Buffer
        } else {
            Strategy::Nominal
        }
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn push_sample(&mut self, sample: Milliseconds) {
        if self.samples.len() < SAMPLE_CAPACITY {
            self.samples.push(sample);
        } else {
            self.samples[self.next_slot] = sample;
            self.next_slot = (self.next_slot + 1) % SAMPLE_CAPACITY;
        }
    }

    fn mean(&self) -> f64 {
        let sum: f64 = self.samples.iter().map(|s| s.get()).sum();
        sum / self.samples.len() as f64
    }

    /// Records one render-latency sample and, once at least four samples
    /// have been observed, re-evaluates the strategy. Returns a snapshot
    /// iff the strategy changed on this call.
    pub fn record_render(
        &mut self,
        render_ms: Milliseconds,
        queue_depth: usize,
    ) -> Option<BackpressureSnapshot> {
        self.push_sample(render_ms);
        if self.samples.len() < MIN_SAMPLES_FOR_DECISION {
            return None;
        }
        let avg_render_ms = self.mean();
        let next = self.classify(avg_render_ms);
        if next == self.strategy {
            return None;
        }
        self.strategy = next;
        Some(BackpressureSnapshot {
            strategy: next,
            queue_depth,
            avg_render_ms,
        })
    }

    #[must_use]
    pub fn snapshot(&self, queue_depth: usize) -> BackpressureSnapshot {
        BackpressureSnapshot {
            strategy: self.strategy,
            queue_depth,
            avg_render_ms: if self.samples.is_empty() {
                0.0
            } else {
                self.mean()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_transition_below_four_samples() {
        let mut controller = BackpressureController::new();
        for _ in 0..3 {
            assert!(controller.record_render(Milliseconds::new(30.0), 0).is_none());
        }
        assert_eq!(controller.strategy(), Strategy::Nominal);
    }

    #[test]
    fn shed_on_fourth_high_sample() {
        let mut controller = BackpressureController::new();
        for _ in 0..3 {
            controller.record_render(Milliseconds::new(30.0), 0);
        }
        let snapshot = controller.record_render(Milliseconds::new(30.0), 0);
        let snapshot = snapshot.expect("fourth sample should trigger a transition");
        assert_eq!(snapshot.strategy, Strategy::Shed);
        assert!((snapshot.avg_render_ms - 30.0).abs() < 1e-9);
    }

    #[test]
    fn no_event_on_unchanged_strategy() {
        let mut controller = BackpressureController::new();
        for _ in 0..4 {
            controller.record_render(Milliseconds::new(30.0), 0);
        }
        assert!(controller.record_render(Milliseconds::new(30.0), 0).is_none());
    }

    #[test]
    fn recovers_to_nominal() {
        let mut controller = BackpressureController::new();
        for _ in 0..8 {
            controller.record_render(Milliseconds::new(30.0), 0);
        }
        assert_eq!(controller.strategy(), Strategy::Shed);
        for _ in 0..8 {
            controller.record_render(Milliseconds::new(5.0), 0);
        }
        assert_eq!(controller.strategy(), Strategy::Nominal);
    }
}
