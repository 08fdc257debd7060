//! Column width resolution.
//!
//! Every cell is measured first (content width, longest word, minimums per
//! its width mode), the per-column measurements are aggregated as maxima
//! over the column's live cells, then the difference between the declared
//! table width and the initial column widths is redistributed by a two-pass
//! proportional resize. Pass one respects whole-word readability; pass two
//! sacrifices it and respects only the hard minimum. Whatever cannot be
//! distributed after both passes is rounding slack and is discarded.

use crate::column::Column;
use crate::error::TableError;
use crate::hooks::{self, CellContext};
use crate::measure::Measure;
use crate::style::CellWidth;
use crate::table::Table;
use crate::units::Mm;

/// Narrowest width an auto-sized column may be squeezed to when no explicit
/// minimum is set.
const DEFAULT_MIN_WIDTH: Mm = Mm(10.0);

pub(crate) fn resolve_widths(
    table: &mut Table,
    page_width: Mm,
    measure: &dyn Measure,
) -> Result<(), TableError> {
    measure_cells(table, page_width, measure)?;
    aggregate_columns(table);
    distribute(table);
    Ok(())
}

/// Measure every live cell and derive its width-mode fields. Fires the
/// `did_parse_cell` hooks first, so hooks see (and may rewrite) the cell's
/// content and styles before anything is measured.
fn measure_cells(
    table: &mut Table,
    page_width: Mm,
    measure: &dyn Measure,
) -> Result<(), TableError> {
    let available = page_width - table.settings.margin.left - table.settings.margin.right;
    let mut hooks = std::mem::take(&mut table.hooks);
    let settings = table.settings.clone();
    let columns = table.columns.clone();
    let page_number = table.page_number;

    let result = (|| {
        for row in table.all_rows_mut() {
            let section = row.section;
            let row_index = row.index;
            for column in &columns {
                let Some(cell) = row.cells.get_mut(&column.index) else {
                    continue;
                };
                {
                    let mut ctx = CellContext {
                        cell: &mut *cell,
                        section,
                        row_index,
                        column_index: column.index,
                        column_key: &column.data_key,
                        cursor: None,
                        page_number,
                        settings: &settings,
                    };
                    hooks::run_cell_hooks(&mut hooks.did_parse_cell, &mut ctx);
                }

                let font = cell.styles.font_name.clone();
                let font = font.as_deref();
                let font_size = cell.styles.font_size;
                let character_spacing = cell.styles.character_spacing;
                let hpad = cell.padding().horizontal();

                let mut widest_line = Mm::ZERO;
                for line in &cell.text {
                    widest_line = widest_line
                        .max(measure.text_width(font, line, font_size, character_spacing)?);
                }
                cell.content_width = widest_line + hpad;

                let joined = cell.text.join(" ");
                let mut longest_word = Mm::ZERO;
                for word in joined.split_whitespace() {
                    longest_word = longest_word
                        .max(measure.text_width(font, word, font_size, character_spacing)?);
                }
                cell.min_readable_width = longest_word + hpad;

                match cell.styles.cell_width {
                    CellWidth::Fixed(width) => {
                        cell.min_width = Mm(width);
                        cell.wrapped_width = Mm(width);
                    }
                    CellWidth::Wrap => {
                        // never wider than the page can hold
                        let width = cell.content_width.min(available);
                        cell.min_width = width;
                        cell.wrapped_width = width;
                    }
                    CellWidth::Auto => {
                        let min = if cell.styles.min_cell_width > Mm::ZERO {
                            cell.styles.min_cell_width
                        } else {
                            DEFAULT_MIN_WIDTH
                        };
                        cell.min_width = min;
                        cell.wrapped_width = cell.content_width.max(min);
                    }
                }
            }
        }
        Ok(())
    })();

    table.hooks = hooks;
    result
}

/// Aggregate per-column measurements as maxima over the column's live cells.
/// A column slot with no cell in a given row instead takes any numeric width
/// from its column style, so that a column holding only spanned-over slots
/// can still be sized by the caller.
fn aggregate_columns(table: &mut Table) {
    let mut columns = std::mem::take(&mut table.columns);
    for column in &mut columns {
        for row in table.all_rows() {
            match row.cells.get(&column.index) {
                Some(cell) => {
                    column.wrapped_width = column.wrapped_width.max(cell.wrapped_width);
                    column.min_width = column.min_width.max(cell.min_width);
                    column.min_readable_width =
                        column.min_readable_width.max(cell.min_readable_width);
                }
                None => {
                    let style = table.styles.column_override(&column.data_key, column.index);
                    let width = style.and_then(|style| match style.cell_width {
                        Some(CellWidth::Fixed(width)) => Some(Mm(width)),
                        Some(_) => None,
                        None => style.min_cell_width.filter(|width| *width > Mm::ZERO),
                    });
                    if let Some(width) = width {
                        column.min_width = width;
                        column.wrapped_width = width;
                    }
                }
            }
        }
    }
    table.columns = columns;
}

/// Fix columns carrying an explicit per-cell width, start the rest at their
/// wrapped width, and redistribute the leftover table width across the
/// resizable set.
fn distribute(table: &mut Table) {
    let custom: Vec<Option<Mm>> = table
        .columns
        .iter()
        .map(|column| max_custom_cell_width(table, column.index))
        .collect();

    let mut resizable: Vec<usize> = Vec::new();
    let mut initial_width = Mm::ZERO;
    for (i, column) in table.columns.iter_mut().enumerate() {
        if let Some(width) = custom[i] {
            column.width = width;
        } else {
            column.width = column.wrapped_width;
            resizable.push(i);
        }
        initial_width += column.width;
    }

    let mut resize_width = table.settings.table_width - initial_width;
    if resize_width != Mm::ZERO {
        resize_width = resize_pass(&mut table.columns, &resizable, resize_width, &|column| {
            column.min_readable_width.max(column.min_width)
        });
    }
    if resize_width != Mm::ZERO {
        resize_pass(&mut table.columns, &resizable, resize_width, &|column| {
            column.min_width
        });
    }
}

/// The largest explicit numeric cell width declared anywhere in a column;
/// [None] when the column has no such cell.
fn max_custom_cell_width(table: &Table, column_index: usize) -> Option<Mm> {
    let mut max = Mm::ZERO;
    for row in table.all_rows() {
        if let Some(cell) = row.cells.get(&column_index) {
            if let CellWidth::Fixed(width) = cell.styles.cell_width {
                max = max.max(Mm(width));
            }
        }
    }
    (max > Mm::ZERO).then_some(max)
}

/// One proportional redistribution pass over `resizable` (indices into
/// `columns`), clamping each column to `floor`. Recurses on the columns that
/// can still move until nothing is left to distribute or no column can take
/// more; returns the undistributed remainder, rounded at 1e-10 per step.
fn resize_pass(
    columns: &mut [Column],
    resizable: &[usize],
    resize_width: Mm,
    floor: &dyn Fn(&Column) -> Mm,
) -> Mm {
    if resizable.is_empty() {
        return resize_width;
    }
    let sum_wrapped: Mm = resizable.iter().map(|&i| columns[i].wrapped_width).sum();
    if sum_wrapped == Mm::ZERO {
        return resize_width;
    }

    let initial = resize_width;
    let mut remaining = resize_width;
    for &i in resizable {
        let ratio = columns[i].wrapped_width / sum_wrapped;
        let min = floor(&columns[i]);
        let column = &mut columns[i];
        let suggested = column.width + initial * ratio;
        let new_width = if suggested < min { min } else { suggested };
        remaining -= new_width - column.width;
        column.width = new_width;
    }

    remaining = Mm((remaining.0 * 1e10).round() / 1e10);

    if remaining != Mm::ZERO {
        let next: Vec<usize> = resizable
            .iter()
            .copied()
            .filter(|&i| {
                if remaining < Mm::ZERO {
                    columns[i].width > floor(&columns[i])
                } else {
                    true
                }
            })
            .collect();
        if !next.is_empty() && next.len() < resizable.len() {
            remaining = resize_pass(columns, &next, remaining, floor);
        }
    }

    remaining
}
