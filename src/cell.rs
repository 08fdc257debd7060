use crate::spacing::Edges;
use crate::style::CellStyles;
use crate::units::Mm;

/// One of the three row groups a table is built from, each with an
/// independent visibility policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Head,
    Body,
    Foot,
}

/// A single table cell, owned exclusively by its [`Row`](crate::Row).
///
/// A cell is created with its raw text and resolved style record; the layout
/// passes then fill in the derived fields. `text` starts as the raw content
/// split on hard line breaks and is replaced with the width-wrapped line
/// array once the cell's final width is known. A cell declared with a column
/// or row span ends up owning the covered area outright: its `width`/`height`
/// are the sum over the covered columns/rows, and the covered grid positions
/// hold no cell at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub raw: String,
    /// Wrapped lines; hard breaks only until the fitting pass re-wraps.
    pub text: Vec<String>,
    pub styles: CellStyles,
    pub section: Section,
    /// Number of columns this cell covers, 1 for a plain cell.
    pub col_span: usize,
    /// Number of rows this cell covers, 1 for a plain cell.
    pub row_span: usize,

    /// Longest wrapped line plus horizontal padding.
    pub content_width: Mm,
    /// Height of the wrapped line stack plus vertical padding.
    pub content_height: Mm,
    /// Preferred column width for this cell, per its width mode.
    pub wrapped_width: Mm,
    /// Longest single word plus horizontal padding; the narrowest width below
    /// which a word itself would be clipped.
    pub min_readable_width: Mm,
    pub min_width: Mm,

    /// Final width, post-resize and post-span-merge.
    pub width: Mm,
    /// Final height, post-fit and post-span-merge.
    pub height: Mm,
    /// Draw position, assigned during pagination only.
    pub x: Mm,
    pub y: Mm,
}

impl Cell {
    pub fn new(
        raw: impl Into<String>,
        styles: CellStyles,
        section: Section,
        col_span: usize,
        row_span: usize,
    ) -> Cell {
        let raw = raw.into();
        let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
        let text = normalized.split('\n').map(str::to_string).collect();
        Cell {
            raw,
            text,
            styles,
            section,
            col_span: col_span.max(1),
            row_span: row_span.max(1),
            content_width: Mm::ZERO,
            content_height: Mm::ZERO,
            wrapped_width: Mm::ZERO,
            min_readable_width: Mm::ZERO,
            min_width: Mm::ZERO,
            width: Mm::ZERO,
            height: Mm::ZERO,
            x: Mm::ZERO,
            y: Mm::ZERO,
        }
    }

    /// The cell's resolved padding box (defaults to zero per side).
    pub fn padding(&self) -> Edges {
        self.styles.cell_padding.resolve(Mm::ZERO)
    }

    /// Height required by the current line array: one `font_size ×
    /// line_height` band per line, plus vertical padding, floored at the
    /// style's minimum cell height.
    pub fn natural_height(&self) -> Mm {
        let line_count = self.text.len();
        let line_height = self.styles.font_size * self.styles.line_height;
        let height = Mm(line_count as f64 * line_height) + self.padding().vertical();
        height.max(self.styles.min_cell_height)
    }
}
