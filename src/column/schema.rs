use serde::{Deserialize, Serialize};

use crate::types::{PixelSize, RowIndex};
use crate::wire::format::CELL_H_PADDING;

/// Rows rendered above and below the visible viewport to absorb fast
/// scrolling, on each side.
const OVERSCAN_ROWS: u32 = 3;

/// Closed set of column types the wire format and column store understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    F64,
    I32,
    U32,
    Bool,
    TimestampMs,
    Utf8,
    ListUtf8,
}

/// A single entry of the schema supplied at `INIT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub max_content_chars: u32,
    pub fixed_width: Option<u32>,
}

impl Schema {
    #[must_use]
    pub const fn new(name: String, column_type: ColumnType, max_content_chars: u32) -> Self {
        Self {
            name,
            column_type,
            max_content_chars,
            fixed_width: None,
        }
    }

    #[must_use]
    pub const fn with_fixed_width(mut self, width: u32) -> Self {
        self.fixed_width = Some(width);
        self
    }
}

/// A schema entry paired with layout information computed at `INIT` time.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub schema: Schema,
    pub computed_width: u32,
    pub column_index: u32,
}

impl ResolvedColumn {
    #[must_use]
    pub const fn name(&self) -> &String {
        &self.schema.name
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.schema.column_type
    }
}

/// Resolves a schema against a layout-engine hint, computing each column's
/// pixel width: `fixedWidth ?? (maxContentChars * charWidthHint + 2 * CELL_H_PADDING)`.
#[must_use]
pub fn resolve_columns(schema: &[Schema], char_width_hint: f64) -> Vec<ResolvedColumn> {
    schema
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let computed_width = entry.fixed_width.unwrap_or_else(|| {
                let content_px = f64::from(entry.max_content_chars) * char_width_hint;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let px = (content_px + 2.0 * f64::from(CELL_H_PADDING)).round() as u32;
                px
            });
            ResolvedColumn {
                schema: entry.clone(),
                computed_width,
                column_index: u32::try_from(index).expect("schema too large"),
            }
        })
        .collect()
}

/// `{ columns, rowHeight, totalRows, totalHeight, viewportRows }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportLayout {
    pub columns: Vec<ResolvedColumn>,
    pub row_height: PixelSize,
    pub total_rows: u32,
    pub total_height: PixelSize,
    pub viewport_rows: u32,
}

impl ViewportLayout {
    /// Recomputes a layout snapshot for the current row count and viewport
    /// height: `viewportRows = ceil(viewportHeight / rowHeight) + 1`.
    #[must_use]
    pub fn compute(
        columns: Vec<ResolvedColumn>,
        row_height: PixelSize,
        total_rows: u32,
        viewport_height: PixelSize,
    ) -> Self {
        let viewport_rows = if row_height.get() > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let rows = (viewport_height.get() / row_height.get()).ceil() as u32;
            rows + 1
        } else {
            1
        };
        let total_height = PixelSize::new(row_height.get() * f64::from(total_rows));
        Self {
            columns,
            row_height,
            total_rows,
            total_height,
            viewport_rows,
        }
    }

    /// Computes the row range to request for a new scroll position:
    /// `effectiveRowHeight = pitch` if the consumer measured one (`pitch >
    /// 0`), else `rowHeight`; `startRow = floor(scrollTop /
    /// effectiveRowHeight)`; `rowCount = viewportRows + 2 * overscan`.
    #[must_use]
    pub fn scroll_window(&self, scroll_top: PixelSize, pitch: PixelSize) -> (RowIndex, u32) {
        let effective_row_height = if pitch.get() > 0.0 {
            pitch.get()
        } else {
            self.row_height.get()
        };
        let start_row = if effective_row_height > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let row = (scroll_top.get() / effective_row_height).floor().max(0.0) as u32;
            row
        } else {
            0
        };
        let row_count = self.viewport_rows + 2 * OVERSCAN_ROWS;
        (RowIndex::new(start_row), row_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(viewport_rows: u32) -> ViewportLayout {
        ViewportLayout {
            columns: Vec::new(),
            row_height: PixelSize::new(20.0),
            total_rows: 1000,
            total_height: PixelSize::new(20_000.0),
            viewport_rows,
        }
    }

    #[test]
    fn scroll_window_uses_row_height_by_default() {
        let (start_row, row_count) = layout(10).scroll_window(PixelSize::new(205.0), PixelSize::new(0.0));
        assert_eq!(start_row, RowIndex::new(10));
        assert_eq!(row_count, 16);
    }

    #[test]
    fn scroll_window_prefers_measured_pitch_over_row_height() {
        let (start_row, _) = layout(10).scroll_window(PixelSize::new(205.0), PixelSize::new(41.0));
        assert_eq!(start_row, RowIndex::new(5));
    }

    #[test]
    fn scroll_window_expands_by_overscan_on_each_side() {
        let (_, row_count) = layout(4).scroll_window(PixelSize::new(0.0), PixelSize::new(0.0));
        assert_eq!(row_count, 4 + 2 * OVERSCAN_ROWS);
    }
}
