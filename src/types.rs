//! Branded scalar wrappers.
//!
//! The pipeline passes around several distinct unsigned-integer-like
//! quantities (a row index, a pixel measurement, a millisecond duration, a
//! batch sequence number, a pool slot). They are easy to transpose by
//! accident if they all stay plain `u32`/`f64`, so each gets its own
//! newtype and only the arithmetic it actually needs.

/// Zero-based row offset into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RowIndex(pub u32);

impl RowIndex {
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn saturating_add(self, count: u32) -> Self {
        Self(self.0.saturating_add(count))
    }
}

impl From<u32> for RowIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A length or position measured in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct PixelSize(pub f64);

impl PixelSize {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

/// A duration measured in whole milliseconds, kept as `f64` to match the
/// wire-level `timestamp_ms` representation it is so often compared against.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Milliseconds(pub f64);

impl Milliseconds {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

/// Monotonic ingest-batch sequence number, assigned by the main-side pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BatchSeq(pub u32);

impl BatchSeq {
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Monotonic window-emission sequence number, assigned by the worker.
///
/// `DataWindow` types this field as `BatchSeq` as well — it
/// is the same brand, just a distinct counter instance from the one the
/// main-side pump assigns to ingest commands.
pub type WindowSeq = BatchSeq;

/// Identifies a slot in a consumer-side recycling pool (e.g. a DOM row
/// element pool). The engine never allocates these itself; it only carries
/// the type so callers can key their own pools without reaching for a bare
/// integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PoolSlot(pub u32);

impl PoolSlot {
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}
