//! A mid-level, opinionated library for laying out and paginating tables
//! for PDF output.
//!
//! `table-gen` takes tabular content (head / body / foot rows, column
//! declarations, layered styles) and a declared table width, then resolves
//! column widths under the declared constraints, wraps text into cells,
//! collapses column and row spans into their anchor cells, and walks the
//! body rows against the page height deciding, per row, whether to print it
//! whole, split it at a line boundary, or defer it to the next page — while
//! repeating head and foot sections across pages per their visibility
//! policies.
//!
//! The engine renders nothing itself: text measurement and drawing are
//! supplied by the caller through the [`Measure`] and [`DrawTarget`]
//! traits, which keeps layout independent of any particular PDF writer.
//! [`FontMeasurer`] provides a ready-made [`Measure`] backed by a TTF/OTF
//! face.
//!
//! ```
//! use table_gen::*;
//!
//! /// Fixed-advance metrics: half the font size per character.
//! struct Mono;
//! impl Measure for Mono {
//!     fn text_width(
//!         &self,
//!         _font: Option<&str>,
//!         text: &str,
//!         font_size: f64,
//!         _character_spacing: f64,
//!     ) -> Result<Mm, TableError> {
//!         Ok(Mm(text.chars().count() as f64 * font_size * 0.5))
//!     }
//! }
//!
//! /// Counts draw calls instead of rendering them.
//! struct Target {
//!     cells: usize,
//! }
//! impl DrawTarget for Target {
//!     fn page_size(&self) -> (Mm, Mm) {
//!         (Mm(210.0), Mm(297.0))
//!     }
//!     fn draw_cell(&mut self, _frame: &CellFrame<'_>) -> Result<(), TableError> {
//!         self.cells += 1;
//!         Ok(())
//!     }
//!     fn draw_border(&mut self, _frame: &BorderFrame) -> Result<(), TableError> {
//!         Ok(())
//!     }
//!     fn next_page(&mut self) -> Result<(), TableError> {
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), TableError> {
//! let options = TableOptions {
//!     start_y: Mm(15.0),
//!     table_width: Mm(180.0),
//!     margin: Spacing::Uniform(15.0),
//!     columns: vec![ColumnDef::new("Name"), ColumnDef::new("City")],
//!     body: vec![
//!         ["Alice", "New York"].into(),
//!         ["Bob", "Tokyo"].into(),
//!     ],
//!     ..Default::default()
//! };
//! let mut target = Target { cells: 0 };
//! let table = draw_table(options, &Mono, &mut target)?;
//! // one synthesized head row plus two body rows, two columns each
//! assert_eq!(target.cells, 6);
//! assert_eq!(table.page_number, 1);
//! # Ok(())
//! # }
//! ```

mod cell;
mod colour;
mod column;
mod draw;
mod error;
mod hooks;
mod layout;
mod measure;
mod row;
mod spacing;
mod style;
mod table;
mod units;

pub use cell::*;
pub use colour::*;
pub use column::*;
pub use draw::*;
pub use error::*;
pub use hooks::*;
pub use measure::*;
pub use row::*;
pub use spacing::*;
pub use style::*;
pub use table::*;
pub use units::*;
