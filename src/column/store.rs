use std::borrow::Cow;

use crate::column::list_utf8::ListUtf8Column;
use crate::column::numeric::NumericColumn;
use crate::column::schema::{ResolvedColumn, Schema, ViewportLayout, resolve_columns};
use crate::column::utf8::Utf8Column;
use crate::column::ColumnType;
use crate::error::{Error, Result};
use crate::types::{BatchSeq, PixelSize, RowIndex};
use crate::wire::{ParsedBatch, ParsedColumn, parse};

/// One growable column per schema entry.
#[derive(Debug, Clone)]
enum Column {
    Numeric(NumericColumn),
    Utf8(Utf8Column),
    ListUtf8(ListUtf8Column),
}

impl Column {
    fn new(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Utf8 => Self::Utf8(Utf8Column::new()),
            ColumnType::ListUtf8 => Self::ListUtf8(ListUtf8Column::new()),
            _ => Self::Numeric(NumericColumn::new(column_type)),
        }
    }

    fn row_count(&self) -> usize {
        match self {
            Self::Numeric(c) => c.row_count(),
            Self::Utf8(c) => c.row_count(),
            Self::ListUtf8(c) => c.row_count(),
        }
    }

    fn column_type(&self) -> ColumnType {
        match self {
            Self::Numeric(c) => c.column_type(),
            Self::Utf8(_) => ColumnType::Utf8,
            Self::ListUtf8(_) => ColumnType::ListUtf8,
        }
    }

    fn append(&mut self, fragment: &ParsedColumn<'_>, batch_row_count: usize) -> Result<()> {
        match self {
            Self::Numeric(c) => c.append(fragment, batch_row_count),
            Self::Utf8(c) => c.append(fragment, batch_row_count),
            Self::ListUtf8(c) => c.append(fragment, batch_row_count),
        }
    }
}

/// Outcome of a single [`Store::commit`] call: tells the orchestrator which
/// events to emit without the store knowing anything about the channel or
/// event types.
pub enum CommitOutcome {
    /// The batch committed cleanly; `total_rows` reflects the new count.
    Committed { total_rows: u32 },
    /// The batch could not be committed; the store was left unmodified
    /// unless `fatal` is set, in which case an integrity violation was
    /// detected *after* mutation and the store is now in an error state.
    Rejected { error: Error, fatal: bool },
}

/// Growable columnar store: one column per schema entry, created at `INIT`
/// and living for the store's lifetime.
pub struct Store {
    schema: Vec<Schema>,
    resolved: Vec<ResolvedColumn>,
    columns: Vec<Column>,
    total_rows: u32,
    char_width_hint: f64,
    row_height: PixelSize,
    viewport_height: PixelSize,
}

impl Store {
    #[must_use]
    pub fn new(schema: Vec<Schema>, char_width_hint: f64, row_height: PixelSize) -> Self {
        let resolved = resolve_columns(&schema, char_width_hint);
        let columns = schema.iter().map(|s| Column::new(s.column_type)).collect();
        Self {
            schema,
            resolved,
            columns,
            total_rows: 0,
            char_width_hint,
            row_height,
            viewport_height: PixelSize::new(0.0),
        }
    }

    #[must_use]
    pub const fn total_rows(&self) -> u32 {
        self.total_rows
    }

    #[must_use]
    pub fn schema(&self) -> &[Schema] {
        &self.schema
    }

    pub fn set_viewport_height(&mut self, height: PixelSize) {
        self.viewport_height = height;
    }

    /// Recomputes the current viewport layout from the store's row count
    /// and the last-known viewport height.
    #[must_use]
    pub fn layout(&self) -> ViewportLayout {
        ViewportLayout::compute(
            self.resolved.clone(),
            self.row_height,
            self.total_rows,
            self.viewport_height,
        )
    }

    /// Parses and commits one ingest batch, following the five-step
    /// protocol: parse, pre-check schema, append, post-check
    /// integrity, and report the outcome. No partial commit is observable:
    /// schema is validated against every column before any append runs.
    pub fn commit(&mut self, buffer: &[u8]) -> CommitOutcome {
        let parsed = match parse(buffer) {
            Ok(p) => p,
            Err(err) => return CommitOutcome::Rejected { error: err, fatal: false },
        };

        if let Err(err) = self.check_schema(&parsed) {
            return CommitOutcome::Rejected { error: err, fatal: false };
        }

        let batch_row_count = parsed.row_count as usize;
        for (column, fragment) in self.columns.iter_mut().zip(&parsed.columns) {
            if let Err(err) = column.append(fragment, batch_row_count) {
                return CommitOutcome::Rejected { error: err, fatal: true };
            }
        }

        let expected_rows = self.total_rows as usize + batch_row_count;
        if let Err(err) = self.check_integrity(expected_rows) {
            return CommitOutcome::Rejected { error: err, fatal: true };
        }
        if let Err(err) = self.check_list_utf8_alignment(self.total_rows as usize, batch_row_count) {
            return CommitOutcome::Rejected { error: err, fatal: true };
        }

        self.total_rows = u32::try_from(expected_rows).unwrap_or(u32::MAX);
        CommitOutcome::Committed {
            total_rows: self.total_rows,
        }
    }

    fn check_schema(&self, parsed: &ParsedBatch<'_>) -> Result<()> {
        let overlap = parsed.columns.len().min(self.schema.len());
        for index in 0..overlap {
            let got = parsed.columns[index].column_type();
            let expected = self.schema[index].column_type;
            if got != expected {
                return Err(Error::SchemaMismatch {
                    column_index: u32::try_from(index).unwrap_or(u32::MAX),
                    name: Cow::Owned(self.schema[index].name.clone()),
                    expected,
                    got,
                });
            }
        }
        Ok(())
    }

    fn check_integrity(&self, expected_rows: usize) -> Result<()> {
        for (schema, column) in self.schema.iter().zip(&self.columns) {
            if column.row_count() != expected_rows {
                return Err(Error::IntegrityViolation {
                    column_name: Cow::Owned(schema.name.clone()),
                    column_rows: column.row_count(),
                    expected_rows,
                });
            }
        }
        Ok(())
    }

    /// Cross-checks every `list_utf8` column against the first one over the
    /// rows just appended. The wire header's shared `rowCount` guarantees
    /// every column ends up with the same total row count, but says
    /// nothing about how many items each column's *own* row holds, so two
    /// `list_utf8` columns can agree on row count while disagreeing row by
    /// row on item count. `check_integrity` alone cannot see that; this
    /// does, by diffing per-row item counts column by column.
    fn check_list_utf8_alignment(&self, batch_start_row: usize, batch_row_count: usize) -> Result<()> {
        let mut reference: Option<(&str, Vec<u32>)> = None;
        for (schema, column) in self.schema.iter().zip(&self.columns) {
            let Column::ListUtf8(list_column) = column else {
                continue;
            };
            let counts = list_column.row_item_counts(batch_start_row, batch_row_count);
            match &reference {
                None => reference = Some((schema.name.as_str(), counts)),
                Some((ref_name, ref_counts)) => {
                    let mismatch = counts
                        .iter()
                        .zip(ref_counts.iter())
                        .enumerate()
                        .find(|(_, (got, want))| got != want);
                    if let Some((row_offset, (got, want))) = mismatch {
                        return Err(Error::ListItemCountMismatch {
                            row: batch_start_row + row_offset,
                            column_name: Cow::Owned(schema.name.clone()),
                            item_count: *got,
                            sibling_name: Cow::Owned((*ref_name).to_owned()),
                            sibling_item_count: *want,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Slices every column over rows `[start_row, start_row + count)`,
    /// clamped to the store's current row count, returning one wire-ready
    /// data block per column in schema order.
    #[must_use]
    pub fn slice_columns(&self, start_row: RowIndex, count: usize) -> Vec<Vec<u8>> {
        let start = start_row.get() as usize;
        self.columns
            .iter()
            .map(|column| match column {
                Column::Numeric(c) => c.copy_slice(start, count),
                Column::Utf8(c) => {
                    let (offsets, bytes) = c.copy_slice(start, count);
                    frame_utf8(&offsets, &bytes)
                }
                Column::ListUtf8(c) => {
                    let (row_offsets, item_offsets, bytes) = c.copy_slice(start, count);
                    frame_list_utf8(&row_offsets, &item_offsets, &bytes)
                }
            })
            .collect()
    }

    /// The number of rows actually covered by a slice starting at
    /// `start_row` and requesting `count` rows, clamped to the rows
    /// actually present in the store.
    #[must_use]
    pub fn clamp_count(&self, start_row: RowIndex, count: usize) -> usize {
        let start = start_row.get() as usize;
        count.min(self.total_rows as usize - start.min(self.total_rows as usize))
    }
}

fn frame_utf8(offsets: &[u32], bytes: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(offsets.len() * 4 + bytes.len());
    for &offset in offsets {
        buf.extend_from_slice(&offset.to_le_bytes());
    }
    buf.extend_from_slice(bytes);
    buf
}

fn frame_list_utf8(row_offsets: &[u32], item_offsets: &[u32], bytes: &[u8]) -> Vec<u8> {
    let total_items = u32::try_from(item_offsets.len() - 1).unwrap_or(u32::MAX);
    let mut buf =
        Vec::with_capacity(4 + row_offsets.len() * 4 + item_offsets.len() * 4 + bytes.len());
    buf.extend_from_slice(&total_items.to_le_bytes());
    for &offset in row_offsets {
        buf.extend_from_slice(&offset.to_le_bytes());
    }
    for &offset in item_offsets {
        buf.extend_from_slice(&offset.to_le_bytes());
    }
    buf.extend_from_slice(bytes);
    buf
}
