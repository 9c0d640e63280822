use crate::column::ColumnType;
use crate::error::{Error, Result, Stage};
use crate::wire::ParsedColumn;

/// Growable storage for the numeric column kinds (`f64`, `i32`, `u32`,
/// `bool`, `timestamp_ms`). Storage is kept as raw little-endian bytes in
/// the exact wire layout for the column's element size, so appends and
/// slices never transcode.
#[derive(Debug, Clone)]
pub struct NumericColumn {
    column_type: ColumnType,
    elem_size: usize,
    bytes: Vec<u8>,
    row_count: usize,
}

impl NumericColumn {
    #[must_use]
    pub fn new(column_type: ColumnType) -> Self {
        let elem_size = column_type
            .fixed_elem_size()
            .expect("NumericColumn requires a fixed-width column type");
        Self {
            column_type,
            elem_size,
            bytes: Vec::new(),
            row_count: 0,
        }
    }

    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Appends `batch_row_count` rows' worth of raw bytes from a parsed
    /// batch column fragment. Capacity doubles on overflow so repeated
    /// small batches still amortize to O(1) per row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaMismatch`]-adjacent truncation errors if the
    /// fragment's byte length does not match `batch_row_count * elem_size`.
    pub fn append(&mut self, fragment: &ParsedColumn<'_>, batch_row_count: usize) -> Result<()> {
        let bytes = fragment.numeric_bytes().ok_or_else(|| Error::IntegrityViolation {
            column_name: "<numeric>".into(),
            column_rows: 0,
            expected_rows: batch_row_count,
        })?;
        let expected = batch_row_count * self.elem_size;
        if bytes.len() != expected {
            return Err(Error::Truncated {
                stage: Stage::Integrity,
                needed: expected,
                available: bytes.len(),
            });
        }
        self.reserve_additional(bytes.len());
        self.bytes.extend_from_slice(bytes);
        self.row_count += batch_row_count;
        Ok(())
    }

    fn reserve_additional(&mut self, additional: usize) {
        let needed = self.bytes.len() + additional;
        if needed > self.bytes.capacity() {
            let mut new_cap = self.bytes.capacity().max(1);
            while new_cap < needed {
                new_cap *= 2;
            }
            self.bytes.reserve(new_cap - self.bytes.len());
        }
    }

    /// Returns the raw byte range for rows `[start_row, start_row + count)`,
    /// clamped to the column's current row count.
    #[must_use]
    pub fn copy_slice(&self, start_row: usize, count: usize) -> Vec<u8> {
        let start_row = start_row.min(self.row_count);
        let actual = count.min(self.row_count - start_row);
        let byte_start = start_row * self.elem_size;
        let byte_end = byte_start + actual * self.elem_size;
        self.bytes[byte_start..byte_end].to_vec()
    }
}
