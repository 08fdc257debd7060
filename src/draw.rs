use crate::cell::{Cell, Section};
use crate::colour::Colour;
use crate::error::TableError;
use crate::spacing::Edges;
use crate::style::CellStyles;
use crate::units::Mm;

/// The current draw position, advanced left-to-right within a row and
/// top-to-bottom down the page as cells and rows are placed.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Pos {
    pub x: Mm,
    pub y: Mm,
}

/// Everything the draw collaborator needs to render one resolved cell:
/// position, final box, wrapped lines and the style record, with padding and
/// border widths already resolved per side.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFrame<'a> {
    pub x: Mm,
    pub y: Mm,
    pub width: Mm,
    pub height: Mm,
    pub text: &'a [String],
    pub section: Section,
    pub styles: &'a CellStyles,
    pub padding: Edges,
    pub border_width: Edges,
}

impl Cell {
    /// The draw descriptor for this cell at its assigned position.
    pub fn frame(&self) -> CellFrame<'_> {
        CellFrame {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            text: &self.text,
            section: self.section,
            styles: &self.styles,
            padding: self.padding(),
            border_width: self.styles.line_width.resolve(Mm::ZERO),
        }
    }
}

/// The outer table border drawn once per page, spanning from the row group's
/// start position down to the cursor where the page's content ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderFrame {
    pub x: Mm,
    pub y: Mm,
    pub width: Mm,
    pub height: Mm,
    pub line_width: Mm,
    pub line_colour: Colour,
}

/// The draw collaborator: renders resolved boxes onto the current page and
/// moves between pages.
///
/// The engine calls these methods sequentially and in a fixed order
/// (left-to-right within a row, top-to-bottom within a section, head/body/foot
/// order, page after page). Any error aborts the remainder of the table
/// render; pages already drawn are the caller's to keep or discard.
pub trait DrawTarget {
    /// Current page dimensions; consulted at table start and once per
    /// page-break decision.
    fn page_size(&self) -> (Mm, Mm);

    /// Render one cell (background, borders, text).
    fn draw_cell(&mut self, frame: &CellFrame<'_>) -> Result<(), TableError>;

    /// Render the outer table border for the current page.
    fn draw_border(&mut self, frame: &BorderFrame) -> Result<(), TableError>;

    /// Finish the current page and make a fresh one current.
    fn next_page(&mut self) -> Result<(), TableError>;
}
