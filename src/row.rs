use std::collections::BTreeMap;

use crate::cell::{Cell, Section};
use crate::column::Column;
use crate::units::Mm;

/// The index given to synthetic remainder rows produced when a row is split
/// across a page boundary. Original content rows always have their 0-based
/// section index.
pub const REMAINDER_ROW_INDEX: i32 = -1;

/// A single table row: a sparse mapping from column index to the cell that
/// anchors there. Columns covered by a neighbouring cell's span have no entry
/// at all, keeping every cell singly owned.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: i32,
    pub section: Section,
    pub cells: BTreeMap<usize, Cell>,
    /// Resolved row height: the max content height among this row's live
    /// cells after span propagation.
    pub height: Mm,
}

impl Row {
    pub fn new(index: i32, section: Section, cells: BTreeMap<usize, Cell>) -> Row {
        Row {
            index,
            section,
            cells,
            height: Mm::ZERO,
        }
    }

    /// The tallest resolved cell in this row.
    pub fn max_cell_height(&self, columns: &[Column]) -> Mm {
        columns
            .iter()
            .filter_map(|column| self.cells.get(&column.index))
            .map(|cell| cell.height)
            .fold(Mm::ZERO, Mm::max)
    }

    /// Whether the whole row fits within `height`.
    pub fn can_fit_entirely(&self, height: Mm, columns: &[Column]) -> bool {
        self.max_cell_height(columns) <= height
    }

    /// The smallest height this row can be printed at: the largest
    /// single-line-plus-padding requirement across its live cells. Below this
    /// not even one line of every cell fits.
    pub fn min_row_height(&self, columns: &[Column]) -> Mm {
        columns
            .iter()
            .filter_map(|column| self.cells.get(&column.index))
            .map(|cell| cell.padding().vertical() + Mm(cell.styles.line_height))
            .fold(Mm::ZERO, Mm::max)
    }
}

/// Total height of a row slice, by each row's tallest cell.
pub(crate) fn section_height(rows: &[Row], columns: &[Column]) -> Mm {
    rows.iter().map(|row| row.max_cell_height(columns)).sum()
}
