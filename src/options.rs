//! Engine configuration: a plain data struct with `#[must_use] const fn
//! with_*` builder methods and sensible defaults, rather than a constructor
//! taking a dozen positional arguments.

use crate::backpressure::{DEFAULT_BUFFER_THRESHOLD_MS, DEFAULT_SHED_THRESHOLD_MS, MAX_QUEUE_DEPTH};
use crate::types::{Milliseconds, PixelSize};

/// Configures layout hints and backpressure thresholds for one orchestrator
/// instance. Overriding the thresholds is mainly useful for deterministic
/// tests that want to force a `BUFFER`/`SHED` transition without 8 real
/// slow frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    char_width_hint: f64,
    row_height_hint: PixelSize,
    viewport_height: PixelSize,
    max_queue_depth: usize,
    buffer_threshold_ms: Milliseconds,
    shed_threshold_ms: Milliseconds,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            char_width_hint: 7.0,
            row_height_hint: PixelSize::new(24.0),
            viewport_height: PixelSize::new(0.0),
            max_queue_depth: MAX_QUEUE_DEPTH,
            buffer_threshold_ms: Milliseconds::new(DEFAULT_BUFFER_THRESHOLD_MS),
            shed_threshold_ms: Milliseconds::new(DEFAULT_SHED_THRESHOLD_MS),
        }
    }

    #[must_use]
    pub const fn with_char_width_hint(mut self, pixels: f64) -> Self {
        self.char_width_hint = pixels;
        self
    }

    #[must_use]
    pub const fn with_row_height_hint(mut self, height: PixelSize) -> Self {
        self.row_height_hint = height;
        self
    }

    #[must_use]
    pub const fn with_viewport_height(mut self, height: PixelSize) -> Self {
        self.viewport_height = height;
        self
    }

    #[must_use]
    pub const fn with_max_queue_depth(mut self, depth: usize) -> Self {
        self.max_queue_depth = depth;
        self
    }

    #[must_use]
    pub const fn with_buffer_threshold_ms(mut self, threshold: Milliseconds) -> Self {
        self.buffer_threshold_ms = threshold;
        self
    }

    #[must_use]
    pub const fn with_shed_threshold_ms(mut self, threshold: Milliseconds) -> Self {
        self.shed_threshold_ms = threshold;
        self
    }

    #[must_use]
    pub const fn char_width_hint(&self) -> f64 {
        self.char_width_hint
    }

    #[must_use]
    pub const fn row_height_hint(&self) -> PixelSize {
        self.row_height_hint
    }

    #[must_use]
    pub const fn viewport_height(&self) -> PixelSize {
        self.viewport_height
    }

    #[must_use]
    pub const fn max_queue_depth(&self) -> usize {
        self.max_queue_depth
    }

    #[must_use]
    pub const fn buffer_threshold_ms(&self) -> Milliseconds {
        self.buffer_threshold_ms
    }

    #[must_use]
    pub const fn shed_threshold_ms(&self) -> Milliseconds {
        self.shed_threshold_ms
    }
}
