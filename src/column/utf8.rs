use crate::error::{Error, Result, Stage};
use crate::wire::ParsedColumn;

/// Growable storage for a `utf8` column: a parallel `offsets`/`bytes` pair
/// kept in store-absolute form, matching the wire layout exactly.
#[derive(Debug, Clone, Default)]
pub struct Utf8Column {
    offsets: Vec<u32>,
    bytes: Vec<u8>,
}

impl Utf8Column {
    #[must_use]
    pub fn new() -> Self {
        Self {
            offsets: vec![0],
            bytes: Vec::new(),
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Appends a batch's `utf8` fragment, remapping its batch-relative
    /// offsets to store-absolute offsets by adding the pre-append byte
    /// length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Truncated`] if the fragment's offset table does not
    /// describe exactly `batch_row_count + 1` entries.
    pub fn append(&mut self, fragment: &ParsedColumn<'_>, batch_row_count: usize) -> Result<()> {
        let ParsedColumn::Utf8(parsed) = fragment else {
            return Err(Error::IntegrityViolation {
                column_name: "<utf8>".into(),
                column_rows: 0,
                expected_rows: batch_row_count,
            });
        };
        if parsed.offsets.len() != batch_row_count + 1 {
            return Err(Error::Truncated {
                stage: Stage::Integrity,
                needed: batch_row_count + 1,
                available: parsed.offsets.len(),
            });
        }
        let base = u32::try_from(self.bytes.len()).expect("utf8 column exceeds u32 byte range");
        for &offset in &parsed.offsets[1..] {
            self.offsets.push(base + offset);
        }
        self.bytes.extend_from_slice(parsed.bytes);
        Ok(())
    }

    /// Returns a rebased offset array plus the corresponding byte range for
    /// rows `[start_row, start_row + count)`, clamped to the column's
    /// current row count.
    #[must_use]
    pub fn copy_slice(&self, start_row: usize, count: usize) -> (Vec<u32>, Vec<u8>) {
        let row_count = self.row_count();
        let start_row = start_row.min(row_count);
        let actual = count.min(row_count - start_row);

        let byte_start = self.offsets[start_row];
        let mut rebased = Vec::with_capacity(actual + 1);
        for &offset in &self.offsets[start_row..=start_row + actual] {
            rebased.push(offset - byte_start);
        }
        let bytes = self.bytes[byte_start as usize..self.offsets[start_row + actual] as usize]
            .to_vec();
        (rebased, bytes)
    }
}
