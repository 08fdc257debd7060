//! Final text fitting.
//!
//! Runs after column spans are collapsed (wrapping needs the post-merge cell
//! widths) and before row spans are collapsed (row heights must be settled
//! first). The carried span-height counter lets a tall row-spanning cell
//! inflate the rows it covers even though those rows no longer hold the
//! cell; it is decremented once per row visited, which is why this pass must
//! walk head, body and foot concatenated rather than per section.

use crate::error::TableError;
use crate::measure::{split_to_width, Measure};
use crate::row::Row;
use crate::table::Table;
use crate::units::Mm;

pub(crate) fn fit_content(table: &mut Table, measure: &dyn Measure) -> Result<(), TableError> {
    let columns: Vec<usize> = table.columns.iter().map(|column| column.index).collect();
    let mut span_height = Mm::ZERO;
    let mut span_count = 0isize;

    let rows: Vec<&mut Row> = table
        .head
        .iter_mut()
        .chain(table.body.iter_mut())
        .chain(table.foot.iter_mut())
        .collect();

    for row in rows {
        for &column in &columns {
            let Some(cell) = row.cells.get_mut(&column) else {
                continue;
            };

            cell.text = split_to_width(
                measure,
                cell.styles.font_name.as_deref(),
                &cell.text.join(" "),
                cell.styles.font_size,
                cell.styles.character_spacing,
                cell.width,
            )?;
            cell.content_height = cell.natural_height();

            // a row-spanning cell contributes an even share of its height to
            // every covered row
            let mut real_height = cell.content_height / cell.row_span as f64;
            let spanned = real_height * cell.row_span as f64;
            if cell.row_span > 1 && spanned > span_height * span_count as f64 {
                span_height = real_height;
                span_count = cell.row_span as isize;
            } else if span_count > 0 && span_height > real_height {
                real_height = span_height;
            }
            if real_height > row.height {
                row.height = real_height;
            }
        }
        span_count -= 1;
    }
    Ok(())
}
