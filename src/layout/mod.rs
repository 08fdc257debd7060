//! The multi-pass layout pipeline.
//!
//! Passes run strictly in order over the single [`Table`](crate::Table)
//! instance: width resolution, column-span collapse, content fitting,
//! row-span collapse, then pagination. Each pass finishes for the whole
//! table before the next begins; the span and fit passes additionally
//! depend on traversing rows in table order (head, body, foot
//! concatenated) because they carry counters across section boundaries.

mod fit;
mod paginate;
mod span;
mod width;

pub(crate) use fit::fit_content;
pub(crate) use paginate::paginate;
pub(crate) use span::{apply_col_spans, apply_row_spans};
pub(crate) use width::resolve_widths;
