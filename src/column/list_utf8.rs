use crate::error::{Error, Result, Stage};
use crate::wire::ParsedColumn;

/// Growable storage for a `list_utf8` column: a three-level index
/// (`rowOffsets`, `itemOffsets`, `bytes`) kept in store-absolute form.
#[derive(Debug, Clone, Default)]
pub struct ListUtf8Column {
    row_offsets: Vec<u32>,
    item_offsets: Vec<u32>,
    bytes: Vec<u8>,
}

impl ListUtf8Column {
    #[must_use]
    pub fn new() -> Self {
        Self {
            row_offsets: vec![0],
            item_offsets: vec![0],
            bytes: Vec::new(),
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_offsets.len() - 1
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_offsets.len() - 1
    }

    /// Appends a batch's `list_utf8` fragment, remapping its
    /// batch-relative row offsets by the pre-append item count and its
    /// item offsets by the pre-append byte length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Truncated`] if the fragment's index tables are not
    /// shaped for exactly `batch_row_count` rows.
    pub fn append(&mut self, fragment: &ParsedColumn<'_>, batch_row_count: usize) -> Result<()> {
        let ParsedColumn::ListUtf8(parsed) = fragment else {
            return Err(Error::IntegrityViolation {
                column_name: "<list_utf8>".into(),
                column_rows: 0,
                expected_rows: batch_row_count,
            });
        };
        if parsed.row_offsets.len() != batch_row_count + 1 {
            return Err(Error::Truncated {
                stage: Stage::Integrity,
                needed: batch_row_count + 1,
                available: parsed.row_offsets.len(),
            });
        }
        if parsed.item_offsets.len() != parsed.total_items as usize + 1 {
            return Err(Error::Truncated {
                stage: Stage::Integrity,
                needed: parsed.total_items as usize + 1,
                available: parsed.item_offsets.len(),
            });
        }

        let item_base =
            u32::try_from(self.item_offsets.len() - 1).expect("list_utf8 exceeds u32 item range");
        for &offset in &parsed.row_offsets[1..] {
            self.row_offsets.push(item_base + offset);
        }

        let byte_base = u32::try_from(self.bytes.len()).expect("list_utf8 exceeds u32 byte range");
        for &offset in &parsed.item_offsets[1..] {
            self.item_offsets.push(byte_base + offset);
        }

        self.bytes.extend_from_slice(parsed.bytes);
        Ok(())
    }

    /// Returns the number of items in each row of `[start_row, start_row +
    /// count)`, clamped to the column's current row count. Used to cross-
    /// check sibling `list_utf8` columns row by row, since the shared
    /// wire-format row count alone can't catch a per-row item-count
    /// mismatch between them.
    #[must_use]
    pub fn row_item_counts(&self, start_row: usize, count: usize) -> Vec<u32> {
        let row_count = self.row_count();
        let start_row = start_row.min(row_count);
        let end_row = (start_row + count).min(row_count);
        self.row_offsets[start_row..=end_row]
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect()
    }

    /// Returns rebased `rowOffsets`, `itemOffsets`, and the item-byte range
    /// for rows `[start_row, start_row + count)`, clamped to the column's
    /// current row count.
    #[must_use]
    pub fn copy_slice(&self, start_row: usize, count: usize) -> (Vec<u32>, Vec<u32>, Vec<u8>) {
        let row_count = self.row_count();
        let start_row = start_row.min(row_count);
        let actual = count.min(row_count - start_row);

        let item_start = self.row_offsets[start_row];
        let item_end = self.row_offsets[start_row + actual];
        let mut rebased_rows = Vec::with_capacity(actual + 1);
        for &offset in &self.row_offsets[start_row..=start_row + actual] {
            rebased_rows.push(offset - item_start);
        }

        let byte_start = self.item_offsets[item_start as usize];
        let mut rebased_items = Vec::with_capacity((item_end - item_start) as usize + 1);
        for &offset in &self.item_offsets[item_start as usize..=item_end as usize] {
            rebased_items.push(offset - byte_start);
        }

        let byte_end = self.item_offsets[item_end as usize];
        let bytes = self.bytes[byte_start as usize..byte_end as usize].to_vec();

        (rebased_rows, rebased_items, bytes)
    }
}
