//! Span collapse passes.
//!
//! Both passes merge spanned geometry into the anchor cell and delete the
//! covered grid positions outright, so a span never shares a cell between
//! two rows or columns. Column spans collapse per row once column widths are
//! final; row spans collapse across the whole table in document order once
//! row heights are final.

use std::collections::HashMap;

use crate::row::Row;
use crate::table::Table;
use crate::units::Mm;

/// Fold each column-spanning cell's covered columns into its width and drop
/// the covered cells from the row. A span reaching past the last column is
/// truncated at the table edge.
pub(crate) fn apply_col_spans(table: &mut Table) {
    let columns = table.columns.clone();
    for row in table.all_rows_mut() {
        let mut anchor: Option<usize> = None;
        let mut combined_width = Mm::ZERO;
        let mut spans_left: isize = 0;

        for (pos, column) in columns.iter().enumerate() {
            spans_left -= 1;
            if spans_left > 1 && pos + 1 < columns.len() {
                combined_width += column.width;
                row.cells.remove(&column.index);
            } else if let Some(anchor_index) = anchor.take() {
                row.cells.remove(&column.index);
                let width = column.width + combined_width;
                if let Some(cell) = row.cells.get_mut(&anchor_index) {
                    cell.width = width;
                }
            } else {
                let Some(cell) = row.cells.get_mut(&column.index) else {
                    continue;
                };
                spans_left = cell.col_span as isize;
                combined_width = Mm::ZERO;
                if spans_left > 1 {
                    anchor = Some(column.index);
                    combined_width = column.width;
                    continue;
                }
                cell.width = column.width;
            }
        }
    }
}

#[derive(Clone, Copy)]
struct PendingRowSpan {
    /// Position of the anchor's row within the table-order row sequence.
    anchor_row: usize,
    /// Rows still covered by the span (anchor's row included in the count).
    left: usize,
    /// The anchor cell's column span, re-applied on every covered row.
    col_span: usize,
}

/// Accumulate each row-spanning cell's covered rows into its height and drop
/// the covered cells. Walks head, body and foot concatenated, since a span
/// may be declared to run past its section; a span reaching past the last
/// row is truncated.
pub(crate) fn apply_row_spans(table: &mut Table) {
    let columns: Vec<usize> = table.columns.iter().map(|column| column.index).collect();
    let mut pending: HashMap<usize, PendingRowSpan> = HashMap::new();
    let mut col_row_spans_left = 1usize;

    let mut rows: Vec<&mut Row> = table
        .head
        .iter_mut()
        .chain(table.body.iter_mut())
        .chain(table.foot.iter_mut())
        .collect();
    let total = rows.len();

    for row_index in 0..total {
        let row_height = rows[row_index].height;
        for &column in &columns {
            if col_row_spans_left > 1 {
                col_row_spans_left -= 1;
                rows[row_index].cells.remove(&column);
            } else if pending.contains_key(&column) {
                let state = match pending.get_mut(&column) {
                    Some(state) => {
                        state.left -= 1;
                        *state
                    }
                    None => continue,
                };
                if state.left <= 1 {
                    pending.remove(&column);
                }
                col_row_spans_left = state.col_span;
                if let Some(cell) = rows[state.anchor_row].cells.get_mut(&column) {
                    cell.height += row_height;
                }
                rows[row_index].cells.remove(&column);
            } else {
                let remaining = total - row_index;
                let row = &mut rows[row_index];
                let Some(cell) = row.cells.get_mut(&column) else {
                    continue;
                };
                cell.height = row_height;
                if cell.row_span > 1 {
                    pending.insert(
                        column,
                        PendingRowSpan {
                            anchor_row: row_index,
                            left: cell.row_span.min(remaining),
                            col_span: cell.col_span,
                        },
                    );
                }
                col_row_spans_left = cell.col_span;
            }
        }
    }
}
